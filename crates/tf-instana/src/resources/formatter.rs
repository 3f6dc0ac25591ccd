use super::state::{ResourceState, StateError};

/// Decorates user given names with the configured prefix and suffix
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct ResourceNameFormatter {
    prefix: String,
    suffix: String,
}

impl ResourceNameFormatter {
    pub fn format(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }

    /// Strips prefix and suffix, names not carrying them are returned as is
    pub fn undo_format<'n>(&self, full_name: &'n str) -> &'n str {
        let name = full_name.strip_prefix(&self.prefix).unwrap_or(full_name);
        name.strip_suffix(&self.suffix).unwrap_or(name)
    }

    /// Full name to send to the API
    ///
    /// The name is formatted when it changed since the last commit of `state` or when no full name
    /// was computed yet. Otherwise the computed full name is reused so a changed prefix/suffix does
    /// not rename existing objects.
    pub fn full_name(
        &self,
        state: &ResourceState,
        name_field: &str,
        full_name_field: &str,
    ) -> Result<String, StateError> {
        let name = state.required_string(name_field)?;

        match state.string(full_name_field)? {
            Some(full_name) if !state.has_change(name_field) => Ok(full_name.to_string()),
            _ => Ok(self.format(name)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn formatter() -> ResourceNameFormatter {
        ResourceNameFormatter::new("prefix ".into(), " (TF managed)".into())
    }

    #[test]
    fn format_and_undo() {
        let formatter = formatter();
        assert_eq!(formatter.format("ops"), "prefix ops (TF managed)");
        assert_eq!(formatter.undo_format("prefix ops (TF managed)"), "ops");
        assert_eq!(formatter.undo_format("ops"), "ops");
    }

    #[test]
    fn full_name_is_reused_while_name_is_unchanged() {
        let mut state: ResourceState = [("name", "ops")].into_iter().collect();
        assert_eq!(
            formatter().full_name(&state, "name", "full_name"),
            Ok("prefix ops (TF managed)".to_string())
        );

        state.set("full_name", "old ops");
        state.commit();
        assert_eq!(
            formatter().full_name(&state, "name", "full_name"),
            Ok("old ops".to_string())
        );

        state.set("name", "dev");
        assert_eq!(
            formatter().full_name(&state, "name", "full_name"),
            Ok("prefix dev (TF managed)".to_string())
        );
    }
}
