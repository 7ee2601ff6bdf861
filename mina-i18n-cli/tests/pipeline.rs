use std::fs;
use std::path::Path;
use std::sync::Arc;

use mina_i18n_cli::{CliError, Config, PathError, run};
use mina_i18n_mt::{MockMode, MockTranslator};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn scaffold() -> TempDir {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("app");
    write(&app, "app.js", "App({ globalData: { title: \"小程序\" } })\n");
    write(&app, "app.json", "{\"pages\": [\"pages/index/index\"]}\n");
    write(&app, "pages/index/index.js", "Page({ data: { msg: '你好' } })\n");
    write(&app, "pages/index/index.wxml", "<view>欢迎</view>\n");
    write(&app, "pages/index/index.wxss", ".title { color: red; }\n");
    write(&app, "pages/legacy/old.js", "var old = \"旧版\"\n");
    write(&app, "utils/format.js", "module.exports = \"格式\"\n");
    write(&app, ".mina_i18n_ignore", "{\"ignore_list\": [\"pages/legacy\"]}");
    dir
}

fn config(dir: &TempDir, extra: &[&str]) -> Config {
    let source = dir.path().join("app");
    let destination = dir.path().join("out");
    let mut args = vec![
        "mina-i18n".to_string(),
        source.to_string_lossy().into_owned(),
        destination.to_string_lossy().into_owned(),
        "--provider".to_string(),
        "mock".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Config::from_args(args).unwrap()
}

fn mock() -> Arc<MockTranslator> {
    Arc::new(MockTranslator::new(MockMode::Suffix))
}

#[tokio::test]
async fn test_full_pipeline() {
    let dir = scaffold();
    let report = run(&config(&dir, &[]), mock()).await.unwrap();
    let out = dir.path().join("out");

    assert!(report.failed.is_empty());
    assert_eq!(report.scripts, 2);
    assert_eq!(report.templates, 1);

    let app = read(&out, "app.js");
    assert!(app.contains("import { I18nPage } from '@miniprogram-i18n/core'"));
    assert!(app.contains("App({ globalData: { title: i18n.t(\"小程序\") } })"));

    let page = read(&out, "pages/index/index.js");
    assert!(page.contains("I18nPage({ data: { msg: i18n.t('你好') } })"));

    let template = read(&out, "pages/index/index.wxml");
    assert_eq!(
        template,
        "<wxs src=\"../../mina-i18n.wxs\" module=\"i18n\"></wxs>\n<view>{{ i18n.t('欢迎') }}</view>\n"
    );

    // Copied as they are
    assert_eq!(read(&out, "app.json"), "{\"pages\": [\"pages/index/index\"]}\n");
    assert_eq!(read(&out, "pages/index/index.wxss"), ".title { color: red; }\n");
    assert_eq!(read(&out, "pages/legacy/old.js"), "var old = \"旧版\"\n");
    assert_eq!(read(&out, "utils/format.js"), "module.exports = \"格式\"\n");
    assert!(!out.join(".mina_i18n_ignore").exists());

    let zh: serde_json::Value = serde_json::from_str(&read(&out, "i18n/zh-CN.json")).unwrap();
    let en: serde_json::Value = serde_json::from_str(&read(&out, "i18n/en-US.json")).unwrap();
    for text in ["小程序", "你好", "欢迎"] {
        assert_eq!(zh[text], text);
        assert_eq!(en[text], format!("{}_en-US", text));
    }
    assert!(zh.get("旧版").is_none());
    assert!(zh.get("格式").is_none());

    let module = read(&out, "mina-i18n.wxs");
    assert!(module.contains("\"欢迎\": \"欢迎_en-US\""));
    assert!(module.contains("var defaultLocale = 'en-US';"));
}

#[tokio::test]
async fn test_include_path_is_converted() {
    let dir = scaffold();
    run(&config(&dir, &["--include-path", "utils"]), mock())
        .await
        .unwrap();
    let out = dir.path().join("out");

    assert!(read(&out, "utils/format.js").contains("module.exports = i18n.t(\"格式\")"));
    let zh: serde_json::Value = serde_json::from_str(&read(&out, "i18n/zh-CN.json")).unwrap();
    assert_eq!(zh["格式"], "格式");
}

#[tokio::test]
async fn test_script_variant_locale() {
    let dir = scaffold();
    let table = dir.path().join("table.json");
    fs::write(&table, r#"{"欢": "歡", "迎": "迎"}"#).unwrap();
    let table = table.to_string_lossy().into_owned();

    run(
        &config(
            &dir,
            &[
                "--variant-locale",
                "zh-TW",
                "--variant-table",
                table.as_str(),
            ],
        ),
        mock(),
    )
    .await
    .unwrap();

    let tw: serde_json::Value =
        serde_json::from_str(&read(&dir.path().join("out"), "i18n/zh-TW.json")).unwrap();
    assert_eq!(tw["欢迎"], "歡迎");
}

#[tokio::test]
async fn test_failed_translations_fall_back_to_empty() {
    let dir = scaffold();
    let translator = Arc::new(MockTranslator::new(MockMode::Error("offline".to_string())));
    run(&config(&dir, &[]), translator).await.unwrap();

    let en: serde_json::Value =
        serde_json::from_str(&read(&dir.path().join("out"), "i18n/en-US.json")).unwrap();
    assert_eq!(en["你好"], "");
}

#[tokio::test]
async fn test_unparsable_script_is_reported() {
    let dir = scaffold();
    write(&dir.path().join("app"), "pages/broken/broken.js", "var = \"坏了\";\n");

    let report = run(&config(&dir, &[]), mock()).await.unwrap();
    let out = dir.path().join("out");

    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].ends_with("pages/broken/broken.js"));
    assert!(!out.join("pages/broken/broken.js").exists());
    assert!(out.join("pages/index/index.js").exists());
}

#[tokio::test]
async fn test_unparsable_template_is_copied() {
    let dir = scaffold();
    let broken = "<view><!-- 未闭合\n";
    write(&dir.path().join("app"), "pages/index/broken.wxml", broken);

    let report = run(&config(&dir, &[]), mock()).await.unwrap();

    assert_eq!(report.copied_templates.len(), 1);
    assert_eq!(read(&dir.path().join("out"), "pages/index/broken.wxml"), broken);
}

#[tokio::test]
async fn test_non_empty_destination_is_rejected() {
    let dir = scaffold();
    write(&dir.path().join("out"), "keep.txt", "mine");

    let result = run(&config(&dir, &[]), mock()).await;
    assert!(matches!(
        result,
        Err(CliError::Path(PathError::DestinationNotEmpty(_)))
    ));
    assert_eq!(read(&dir.path().join("out"), "keep.txt"), "mine");
}

#[tokio::test]
async fn test_not_a_project() {
    let dir = scaffold();
    fs::remove_file(dir.path().join("app/app.js")).unwrap();

    let result = run(&config(&dir, &[]), mock()).await;
    assert!(matches!(
        result,
        Err(CliError::Path(PathError::NotAProject { missing: "app.js", .. }))
    ));
    assert!(!dir.path().join("out").exists());
}
