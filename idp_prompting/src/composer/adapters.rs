//! Local-filesystem template loader.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial FsTemplateLoader, reading
//!   `system_prompt.txt` / `user_prompt.txt` from a configured directory.

use super::ports::TemplateLoaderPort;

pub struct FsTemplateLoader {
    dir: std::path::PathBuf,
}

impl FsTemplateLoader {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_non_empty(&self, file_name: &str) -> std::result::Result<std::string::String, idp_core::IdpError> {
        let path = self.dir.join(file_name);
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            idp_core::IdpError::ParsingStageFailed(std::format!(
                "failed to read template {}: {err}",
                path.display()
            ))
        })?;
        if contents.trim().is_empty() {
            return std::result::Result::Err(idp_core::IdpError::ParsingStageFailed(std::format!(
                "template file is empty: {}",
                path.display()
            )));
        }
        std::result::Result::Ok(contents)
    }
}

impl TemplateLoaderPort for FsTemplateLoader {
    fn load_system_prompt(&self) -> std::result::Result<std::string::String, idp_core::IdpError> {
        self.read_non_empty("system_prompt.txt")
    }

    fn load_user_template(&self) -> std::result::Result<std::string::String, idp_core::IdpError> {
        self.read_non_empty("user_prompt.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_templates_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system_prompt.txt"), "be helpful").unwrap();
        std::fs::write(
            dir.path().join("user_prompt.txt"),
            "Attributes to be extracted:\n{attributes}",
        )
        .unwrap();
        let loader = FsTemplateLoader::new(dir.path());
        assert_eq!(loader.load_system_prompt().unwrap(), "be helpful");
        assert!(loader.load_user_template().unwrap().contains("Attributes to be extracted:"));
    }

    #[test]
    fn test_missing_file_is_parsing_stage_failed() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsTemplateLoader::new(dir.path());
        let err = loader.load_system_prompt().unwrap_err();
        assert_eq!(err.kind(), idp_core::ErrorKind::ParsingStageFailed);
    }

    #[test]
    fn test_empty_file_is_parsing_stage_failed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system_prompt.txt"), "   \n").unwrap();
        let loader = FsTemplateLoader::new(dir.path());
        assert!(loader.load_system_prompt().is_err());
    }
}
