//! Generator arguments
//!
//! Read-only key/value lookup carrying the deployment coordinates
//! (`project`, `region`, ...) a generator scopes its listing with.

use std::collections::BTreeMap;

pub const PROJECT: &str = "project";
pub const REGION: &str = "region";

/// Coordinates handed to every generator of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorArgs {
    values: BTreeMap<String, String>,
}

impl GeneratorArgs {
    /// Args for the common project + region scope
    pub fn new(project: &str, region: &str) -> Self {
        Self::default().with(PROJECT, project).with(REGION, region)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Substitute every `{key}` placeholder in `template`
    /// Returns the first placeholder with no value as the error
    pub fn render(&self, template: &str) -> Result<String, String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                // Unterminated brace is literal text
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let key = &after[..end];
            match self.get(key) {
                Some(value) => out.push_str(value),
                None => return Err(key.to_string()),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GeneratorArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parent_template() {
        let args = GeneratorArgs::new("P", "R");
        assert_eq!(
            args.render("projects/{project}/locations/{region}").unwrap(),
            "projects/P/locations/R"
        );
    }

    #[test]
    fn test_render_reports_missing_key() {
        let args = GeneratorArgs::default().with(PROJECT, "P");
        assert_eq!(
            args.render("projects/{project}/locations/{region}"),
            Err("region".to_string())
        );
    }

    #[test]
    fn test_render_keeps_unterminated_brace() {
        let args = GeneratorArgs::new("P", "R");
        assert_eq!(args.render("a/{project}/{oops").unwrap(), "a/P/{oops");
    }

    #[test]
    fn test_from_iter() {
        let args: GeneratorArgs = [("project", "p"), ("zone", "z")].into_iter().collect();
        assert_eq!(args.get("zone"), Some("z"));
        assert_eq!(args.get("region"), None);
    }
}
