use criterion::{Criterion, criterion_group, criterion_main};
use themetrie::{RawTheme, create_theme};

fn sample_theme_json() -> String {
    let mut token_colors = String::new();
    for i in 0..200 {
        token_colors.push_str(&format!(
            r#"{{"scope": "source.rust meta.function.{i} entity.name.function.{i}", "settings": {{"foreground": "#{i:06x}"}}}},"#,
            i = i
        ));
    }
    format!(
        r#"{{
            "colors": {{"editor.foreground": "#F8F8F2", "editor.background": "#272822"}},
            "tokenColors": [{token_colors} {{"scope": "keyword.control", "settings": {{"foreground": "#F92672", "fontStyle": "bold"}}}}]
        }}"#
    )
}

fn build_theme_benchmark(c: &mut Criterion) {
    let json = sample_theme_json();

    c.bench_function("build theme (200 qualified rules)", |b| {
        b.iter(|| {
            let raw: RawTheme = serde_json::from_str(&json).unwrap();
            let theme = create_theme(&raw);
            std::hint::black_box(theme);
        })
    });
}

fn match_scope_benchmark(c: &mut Criterion) {
    let raw: RawTheme = serde_json::from_str(&sample_theme_json()).unwrap();
    let theme = create_theme(&raw);
    let stack = vec!["source.rust".to_string(), "meta.function.100".to_string()];

    c.bench_function("match_with_stack (200 qualified rules)", |b| {
        b.iter(|| {
            let winner = theme.match_with_stack("entity.name.function.100", &stack);
            std::hint::black_box(winner);
        })
    });
}

criterion_group!(benches, build_theme_benchmark, match_scope_benchmark);
criterion_main!(benches);
