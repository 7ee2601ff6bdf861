use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use mina_i18n::TargetLocale;
use mina_i18n_mt::translator::validate_locale;
use mina_i18n_mt::{
    BingTranslateProvider, CharTableConverter, GoogleTranslateProvider, MachineTranslator,
    MockMode, MockTranslator, ScriptConverter,
};

use crate::error::CliError;

/// Translation backend selected with `--provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Bing,
    Google,
    Mock,
}

impl ProviderKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bing" => Some(ProviderKind::Bing),
            "google" => Some(ProviderKind::Google),
            "mock" => Some(ProviderKind::Mock),
            _ => None,
        }
    }

    /// Builds the provider. Google reads its key from the environment.
    pub fn build(self) -> Result<Arc<dyn MachineTranslator>, CliError> {
        let translator: Arc<dyn MachineTranslator> = match self {
            ProviderKind::Bing => Arc::new(BingTranslateProvider::new()?),
            ProviderKind::Google => Arc::new(GoogleTranslateProvider::from_env()?),
            ProviderKind::Mock => Arc::new(MockTranslator::new(MockMode::Suffix)),
        };
        Ok(translator)
    }
}

/// Everything a conversion run needs, parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Extra top-level entries to convert, relative to `source`
    pub include_paths: Vec<String>,
    pub provider: ProviderKind,
    pub base_locale: String,
    pub target_locales: Vec<String>,
    pub variant_locales: Vec<String>,
    pub variant_table: Option<PathBuf>,
    pub concurrency: usize,
    pub inject_locale_data: bool,
    pub verbose: bool,
}

impl Config {
    pub fn command() -> Command {
        Command::new("mina-i18n")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Converts a mini-program project into an internationalized copy")
            .arg(
                Arg::new("source")
                    .help("Path of the original mini-program project")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .index(1),
            )
            .arg(
                Arg::new("destination")
                    .help("Path for the converted project (must be empty or not exist)")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .index(2),
            )
            .arg(
                Arg::new("include-path")
                    .long("include-path")
                    .help("Extra top-level paths to convert, comma separated")
                    .value_delimiter(',')
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("provider")
                    .long("provider")
                    .short('p')
                    .help("Translation provider")
                    .value_parser(["bing", "google", "mock"])
                    .default_value("bing"),
            )
            .arg(
                Arg::new("base-locale")
                    .long("base-locale")
                    .help("Locale the project is written in")
                    .default_value("zh-CN"),
            )
            .arg(
                Arg::new("target-locale")
                    .long("target-locale")
                    .short('t')
                    .help("Locales to machine translate into, comma separated")
                    .value_delimiter(',')
                    .action(ArgAction::Append)
                    .default_value("en-US"),
            )
            .arg(
                Arg::new("variant-locale")
                    .long("variant-locale")
                    .help("Locales produced by script conversion, comma separated")
                    .value_delimiter(',')
                    .action(ArgAction::Append)
                    .requires("variant-table"),
            )
            .arg(
                Arg::new("variant-table")
                    .long("variant-table")
                    .help("JSON character table used for script conversion")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("concurrency")
                    .long("concurrency")
                    .short('c')
                    .help("Maximum number of translation requests in flight")
                    .value_parser(value_parser!(usize))
                    .default_value("8"),
            )
            .arg(
                Arg::new("inject-locale-data")
                    .long("inject-locale-data")
                    .help("Merge the current locale into each page's data")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .help("Log every rewritten text")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Parses command line arguments, the first being the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let strings = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|values| {
                    values
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };
        let required_path = |id: &str| -> Result<PathBuf, CliError> {
            matches
                .get_one::<PathBuf>(id)
                .cloned()
                .ok_or_else(|| CliError::Config(format!("missing <{}>", id)))
        };

        let provider_name = matches
            .get_one::<String>("provider")
            .map(String::as_str)
            .unwrap_or("bing");
        let provider = ProviderKind::from_name(provider_name)
            .ok_or_else(|| CliError::Config(format!("unknown provider {}", provider_name)))?;

        let config = Config {
            source: required_path("source")?,
            destination: required_path("destination")?,
            include_paths: strings("include-path"),
            provider,
            base_locale: matches
                .get_one::<String>("base-locale")
                .cloned()
                .unwrap_or_else(|| "zh-CN".to_string()),
            target_locales: strings("target-locale"),
            variant_locales: strings("variant-locale"),
            variant_table: matches.get_one::<PathBuf>("variant-table").cloned(),
            concurrency: matches.get_one::<usize>("concurrency").copied().unwrap_or(8),
            inject_locale_data: matches.get_flag("inject-locale-data"),
            verbose: matches.get_flag("verbose"),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        let locales = std::iter::once(&self.base_locale)
            .chain(&self.target_locales)
            .chain(&self.variant_locales);
        let mut seen = Vec::new();
        for locale in locales {
            validate_locale(locale)?;
            if seen.contains(&locale) {
                return Err(CliError::Config(format!("locale {} is configured twice", locale)));
            }
            seen.push(locale);
        }
        if self.concurrency == 0 {
            return Err(CliError::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Derived locales, machine-translated ones first.
    pub fn targets(&self) -> Vec<TargetLocale> {
        self.target_locales
            .iter()
            .map(|code| TargetLocale::translated(code))
            .chain(
                self.variant_locales
                    .iter()
                    .map(|code| TargetLocale::script_variant(code)),
            )
            .collect()
    }

    /// Loads the script conversion table, if one was given.
    pub fn converter(&self) -> Result<Option<Arc<dyn ScriptConverter>>, CliError> {
        match &self.variant_table {
            Some(path) => {
                let converter: Arc<dyn ScriptConverter> =
                    Arc::new(CharTableConverter::from_file(path)?);
                Ok(Some(converter))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, CliError> {
        Config::from_args(std::iter::once("mina-i18n").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["src", "out"]).unwrap();
        assert_eq!(config.source, PathBuf::from("src"));
        assert_eq!(config.destination, PathBuf::from("out"));
        assert_eq!(config.provider, ProviderKind::Bing);
        assert_eq!(config.base_locale, "zh-CN");
        assert_eq!(config.target_locales, vec!["en-US"]);
        assert!(config.variant_locales.is_empty());
        assert!(config.include_paths.is_empty());
        assert_eq!(config.concurrency, 8);
        assert!(!config.inject_locale_data);
        assert!(!config.verbose);
    }

    #[test]
    fn test_include_paths_split_and_repeat() {
        let config = parse(&[
            "src",
            "out",
            "--include-path",
            "utils,components",
            "--include-path",
            "app.wxss",
        ])
        .unwrap();
        assert_eq!(config.include_paths, vec!["utils", "components", "app.wxss"]);
    }

    #[test]
    fn test_empty_include_path_entries_are_dropped() {
        let config = parse(&["src", "out", "--include-path", "utils,,"]).unwrap();
        assert_eq!(config.include_paths, vec!["utils"]);
    }

    #[test]
    fn test_targets() {
        let config = parse(&[
            "src",
            "out",
            "--target-locale",
            "en-US,ja",
            "--variant-locale",
            "zh-TW",
            "--variant-table",
            "table.json",
        ])
        .unwrap();
        assert_eq!(
            config.targets(),
            vec![
                TargetLocale::translated("en-US"),
                TargetLocale::translated("ja"),
                TargetLocale::script_variant("zh-TW"),
            ]
        );
    }

    #[test]
    fn test_variant_locale_requires_table() {
        assert!(matches!(
            parse(&["src", "out", "--variant-locale", "zh-TW"]),
            Err(CliError::Args(_))
        ));
    }

    #[test]
    fn test_invalid_locale() {
        assert!(matches!(
            parse(&["src", "out", "--target-locale", "en@US"]),
            Err(CliError::Mt(_))
        ));
    }

    #[test]
    fn test_duplicate_locale() {
        assert!(matches!(
            parse(&["src", "out", "--target-locale", "zh-CN"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            parse(&["src", "out", "--provider", "deepl"]),
            Err(CliError::Args(_))
        ));
    }

    #[test]
    fn test_zero_concurrency() {
        assert!(matches!(
            parse(&["src", "out", "--concurrency", "0"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_flags() {
        let config = parse(&["src", "out", "-p", "mock", "--inject-locale-data", "-v"]).unwrap();
        assert_eq!(config.provider, ProviderKind::Mock);
        assert!(config.inject_locale_data);
        assert!(config.verbose);
    }

    #[test]
    fn test_missing_destination() {
        assert!(matches!(parse(&["src"]), Err(CliError::Args(_))));
    }

    #[test]
    fn test_mock_provider_builds() {
        let translator = ProviderKind::Mock.build().unwrap();
        assert_eq!(translator.provider_name(), "Mock Translator");
    }
}
