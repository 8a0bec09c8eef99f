//! Configuration for a terminal-environment installation

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ProvisionError;
use crate::platform::Platform;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for one provisioning run.
///
/// Built once before the run and threaded through manifest construction;
/// steps never read process-global state.
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// User home directory all managed paths hang off
    pub home: PathBuf,
    /// Framework plugins to install (`name` or `owner/name` GitHub slugs)
    pub plugins: Vec<String>,
    /// Prompt theme engine (currently `powerlevel10k` or empty for none)
    pub theme: String,
    /// Editor package to install
    pub editor: String,
    /// Whether to install the fuzzy finder
    pub fuzzy_finder: bool,
    /// Whether to install modern file-listing tools
    pub listing_tools: bool,
    /// Whether to change the user's login shell at the end
    pub change_default_shell: bool,
    /// Time budget applied to each external action
    pub timeout: Duration,
    /// Rendered content of the managed shell configuration file
    pub zshrc_content: String,
}

impl RigConfig {
    /// Create a new config builder.
    pub fn builder() -> RigConfigBuilder {
        RigConfigBuilder::default()
    }

    /// Builder pre-seeded with the current user's home directory.
    pub fn for_current_user() -> Result<RigConfigBuilder, ProvisionError> {
        let home = dirs::home_dir().ok_or(ProvisionError::MissingHomeDir)?;
        Ok(Self::builder().home(home))
    }

    /// Shell framework checkout location.
    pub fn framework_dir(&self) -> PathBuf {
        self.home.join(".oh-my-zsh")
    }

    /// Directory user-installed plugins are cloned into.
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.framework_dir().join("custom/plugins").join(name)
    }

    /// Directory user-installed prompt themes are cloned into.
    pub fn theme_dir(&self, name: &str) -> PathBuf {
        self.framework_dir().join("custom/themes").join(name)
    }

    /// The managed shell configuration file.
    pub fn zshrc_path(&self) -> PathBuf {
        self.home.join(".zshrc")
    }

    /// Source checkout location for the fuzzy finder fallback install.
    pub fn fzf_dir(&self) -> PathBuf {
        self.home.join(".fzf")
    }

    /// Where downloaded prompt fonts are placed on this platform.
    pub fn font_dir(&self, platform: Platform) -> PathBuf {
        match platform {
            Platform::MacOs => self.home.join("Library/Fonts"),
            Platform::Linux | Platform::Wsl => self.home.join(".local/share/fonts"),
        }
    }

    /// Create a test configuration rooted at a scratch directory.
    #[cfg(test)]
    pub fn test_config(home: &std::path::Path) -> Self {
        Self::builder()
            .home(home)
            .zshrc_content("# test zshrc\n")
            .build()
    }
}

/// Builder for [`RigConfig`].
#[derive(Debug, Clone)]
pub struct RigConfigBuilder {
    config: RigConfig,
}

impl Default for RigConfigBuilder {
    fn default() -> Self {
        Self {
            config: RigConfig {
                home: PathBuf::new(),
                plugins: vec![
                    "zsh-autosuggestions".to_string(),
                    "zsh-syntax-highlighting".to_string(),
                ],
                theme: "powerlevel10k".to_string(),
                editor: "neovim".to_string(),
                fuzzy_finder: true,
                listing_tools: true,
                change_default_shell: true,
                timeout: DEFAULT_TIMEOUT,
                zshrc_content: String::new(),
            },
        }
    }
}

impl RigConfigBuilder {
    /// Set the home directory.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.config.home = home.into();
        self
    }

    /// Replace the plugin list.
    pub fn plugins(mut self, plugins: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.plugins = plugins.into_iter().map(Into::into).collect();
        self
    }

    /// Set the prompt theme engine (empty string disables it).
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.config.theme = theme.into();
        self
    }

    /// Set the editor package.
    pub fn editor(mut self, editor: impl Into<String>) -> Self {
        self.config.editor = editor.into();
        self
    }

    /// Toggle the fuzzy-finder install.
    pub fn fuzzy_finder(mut self, enabled: bool) -> Self {
        self.config.fuzzy_finder = enabled;
        self
    }

    /// Toggle the file-listing tool installs.
    pub fn listing_tools(mut self, enabled: bool) -> Self {
        self.config.listing_tools = enabled;
        self
    }

    /// Toggle changing the login shell.
    pub fn change_default_shell(mut self, enabled: bool) -> Self {
        self.config.change_default_shell = enabled;
        self
    }

    /// Set the per-action time budget.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the managed shell configuration content.
    pub fn zshrc_content(mut self, content: impl Into<String>) -> Self {
        self.config.zshrc_content = content.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RigConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_home() {
        let config = RigConfig::builder().home("/home/kim").build();
        assert_eq!(config.framework_dir(), PathBuf::from("/home/kim/.oh-my-zsh"));
        assert_eq!(
            config.plugin_dir("zsh-autosuggestions"),
            PathBuf::from("/home/kim/.oh-my-zsh/custom/plugins/zsh-autosuggestions")
        );
        assert_eq!(config.zshrc_path(), PathBuf::from("/home/kim/.zshrc"));
    }

    #[test]
    fn font_dir_differs_per_platform() {
        let config = RigConfig::builder().home("/home/kim").build();
        assert_eq!(
            config.font_dir(Platform::Linux),
            PathBuf::from("/home/kim/.local/share/fonts")
        );
        assert_eq!(
            config.font_dir(Platform::MacOs),
            PathBuf::from("/home/kim/Library/Fonts")
        );
    }

    #[test]
    fn builder_defaults() {
        let config = RigConfig::builder().build();
        assert_eq!(config.plugins.len(), 2);
        assert_eq!(config.theme, "powerlevel10k");
        assert!(config.change_default_shell);
        assert_eq!(config.timeout, Duration::from_secs(600));
    }
}
