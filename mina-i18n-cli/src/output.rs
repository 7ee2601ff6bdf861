use std::fs;
use std::path::{Path, PathBuf};

use mina_i18n::{Dictionary, Runtime};
use tracing::info;

use crate::error::{CliError, PathError};

pub const DICTIONARY_DIR: &str = "i18n";

/// Writes `i18n/<locale>.json` for every configured locale. Returns the
/// files written.
pub fn write_dictionary(
    destination: &Path,
    dictionary: &Dictionary,
) -> Result<Vec<PathBuf>, CliError> {
    let dir = destination.join(DICTIONARY_DIR);
    fs::create_dir_all(&dir)?;

    let mut written = Vec::new();
    for locale in dictionary.locales() {
        let path = dir.join(format!("{}.json", locale));
        write_new(&path, &dictionary.to_pretty_json(locale)?)?;
        written.push(path);
    }
    info!(
        dir = %dir.display(),
        locales = written.len(),
        texts = dictionary.len(),
        "wrote dictionary"
    );
    Ok(written)
}

/// Writes the WXS module templates resolve their lookups against. Calls
/// that name no locale use [`Dictionary::runtime_locale`].
pub fn write_runtime_module(
    destination: &Path,
    runtime: &Runtime,
    dictionary: &Dictionary,
) -> Result<PathBuf, CliError> {
    let path = destination.join(&runtime.wxs_file);
    let module = runtime.render_wxs_module(dictionary.tables(), dictionary.runtime_locale())?;
    write_new(&path, &module)?;
    Ok(path)
}

fn write_new(path: &Path, content: &str) -> Result<(), CliError> {
    if path.exists() {
        return Err(PathError::Collision(path.to_path_buf()).into());
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mina_i18n::TargetLocale;
    use tempfile::TempDir;

    fn dictionary() -> Dictionary {
        let mut dictionary = Dictionary::new("zh-CN", vec![TargetLocale::translated("en-US")]);
        dictionary.record("你好");
        dictionary.record_translated("你好", "en-US", "Hello");
        dictionary
    }

    #[test]
    fn test_write_dictionary() {
        let dir = TempDir::new().unwrap();
        let written = write_dictionary(dir.path(), &dictionary()).unwrap();
        assert_eq!(written.len(), 2);

        let en: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("i18n/en-US.json")).unwrap())
                .unwrap();
        assert_eq!(en["你好"], "Hello");
        let zh = fs::read_to_string(dir.path().join("i18n/zh-CN.json")).unwrap();
        assert_eq!(zh, "{\n    \"你好\": \"你好\"\n}");
    }

    #[test]
    fn test_existing_output_is_a_collision() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("i18n")).unwrap();
        fs::write(dir.path().join("i18n/en-US.json"), "{}").unwrap();
        let result = write_dictionary(dir.path(), &dictionary());
        assert!(matches!(result, Err(CliError::Path(PathError::Collision(_)))));
    }

    #[test]
    fn test_write_runtime_module() {
        let dir = TempDir::new().unwrap();
        let path = write_runtime_module(dir.path(), &Runtime::default(), &dictionary()).unwrap();
        assert!(path.ends_with("mina-i18n.wxs"));
        let module = fs::read_to_string(path).unwrap();
        assert!(module.contains("\"Hello\""));
        assert!(module.contains("var defaultLocale = 'en-US';"));
    }
}
