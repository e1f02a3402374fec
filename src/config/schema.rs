use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the persisted grids, class list and coefficients.
    /// Defaults to ~/.config/classe-diag/data
    pub data_dir: Option<String>,

    /// Force colored output on or off. Auto-detected from the terminal when unset.
    pub colors: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
data_dir: /srv/classe/data
colors: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("/srv/classe/data"));
        assert_eq!(config.colors, Some(false));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "data_dir: /tmp\nqueries: []\n";
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
