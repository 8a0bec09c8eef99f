//! Installation manifest - complete step sequence

use std::time::Duration;

use crate::config::RigConfig;
use crate::platform::Platform;
use crate::probe::Capability;
use crate::steps::{
    FetchFile, FetchTool, GitClone, PackageInstall, PackageManager, RefreshIndex, ShellCommand,
    Step, WriteManagedFile,
};

const OHMYZSH_REPO: &str = "https://github.com/ohmyzsh/ohmyzsh.git";
const OHMYZSH_INSTALLER: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";
const POWERLEVEL10K_REPO: &str = "https://github.com/romkatv/powerlevel10k.git";
const FZF_REPO: &str = "https://github.com/junegunn/fzf.git";

/// Prompt fonts installed alongside the powerlevel10k theme.
const MESLO_FONTS: [(&str, &str); 4] = [
    (
        "MesloLGS NF Regular.ttf",
        "https://github.com/romkatv/powerlevel10k-media/raw/master/MesloLGS%20NF%20Regular.ttf",
    ),
    (
        "MesloLGS NF Bold.ttf",
        "https://github.com/romkatv/powerlevel10k-media/raw/master/MesloLGS%20NF%20Bold.ttf",
    ),
    (
        "MesloLGS NF Italic.ttf",
        "https://github.com/romkatv/powerlevel10k-media/raw/master/MesloLGS%20NF%20Italic.ttf",
    ),
    (
        "MesloLGS NF Bold Italic.ttf",
        "https://github.com/romkatv/powerlevel10k-media/raw/master/MesloLGS%20NF%20Bold%20Italic.ttf",
    ),
];

/// Complete provisioning manifest: an ordered list of steps.
pub struct Manifest {
    /// Ordered list of provisioning steps
    pub steps: Vec<Step>,
}

impl Manifest {
    /// Create a new empty manifest.
    pub fn new() -> Self {
        Self { steps: vec![] }
    }

    /// Add a step to the manifest.
    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Add a step fluently.
    pub fn with_step(mut self, step: Step) -> Self {
        self.add_step(step);
        self
    }

    /// Create the complete terminal-environment manifest.
    ///
    /// Step order matters: the plugin and theme steps assume the
    /// framework checkout exists, and the managed config references
    /// everything installed before it.
    #[allow(clippy::too_many_lines)]
    pub fn terminal(config: &RigConfig, platform: Platform) -> Self {
        let mut manifest = Self::new();
        let timeout = config.timeout;
        let managers = platform.package_managers();

        // =========================================================
        // Phase 1: Package Index
        // =========================================================
        let mut refresh = Step::new(
            "Refresh package index",
            RefreshIndex::new(managers[0], timeout),
        );
        for manager in &managers[1..] {
            refresh = refresh.or_else(RefreshIndex::new(*manager, timeout));
        }
        manifest.add_step(refresh);

        // =========================================================
        // Phase 2: Core Packages
        // =========================================================
        manifest.add_step(
            package_step("Install zsh", &["zsh"], managers, timeout)
                .unless(Capability::executable("zsh"))
                .required(),
        );
        manifest.add_step(
            package_step("Install git", &["git"], managers, timeout)
                .unless(Capability::executable("git"))
                .required(),
        );
        // Optional: wget remains as the download fallback everywhere curl
        // is used.
        manifest.add_step(
            package_step("Install curl", &["curl"], managers, timeout)
                .unless(Capability::executable("curl")),
        );

        // =========================================================
        // Phase 3: Shell Framework
        // =========================================================
        let framework_dir = config.framework_dir();
        manifest.add_step(
            Step::new(
                "Install oh-my-zsh",
                GitClone::new(OHMYZSH_REPO, &framework_dir, timeout),
            )
            .or_else(ShellCommand::sh(
                "run oh-my-zsh installer script",
                format!(
                    "RUNZSH=no KEEP_ZSHRC=yes sh -c \"$(curl -fsSL {OHMYZSH_INSTALLER})\" \"\" --unattended"
                ),
                timeout,
            ))
            .unless(Capability::directory(&framework_dir))
            .required(),
        );

        // =========================================================
        // Phase 4: Plugins
        // =========================================================
        for plugin in &config.plugins {
            let (name, url) = plugin_source(plugin);
            let dest = config.plugin_dir(&name);
            manifest.add_step(
                Step::new(format!("Install plugin {name}"), GitClone::new(url, &dest, timeout))
                    .unless(Capability::directory(&dest)),
            );
        }

        // =========================================================
        // Phase 5: Prompt Theme
        // =========================================================
        if config.theme == "powerlevel10k" {
            let theme_dir = config.theme_dir("powerlevel10k");
            manifest.add_step(
                Step::new(
                    "Install powerlevel10k",
                    GitClone::new(POWERLEVEL10K_REPO, &theme_dir, timeout),
                )
                .unless(Capability::directory(&theme_dir)),
            );

            let font_dir = config.font_dir(platform);
            for (file, url) in MESLO_FONTS {
                let dest = font_dir.join(file);
                manifest.add_step(
                    Step::new(
                        format!("Download {file}"),
                        FetchFile::new(url, &dest, FetchTool::Curl, timeout),
                    )
                    .or_else(FetchFile::new(url, &dest, FetchTool::Wget, timeout))
                    .unless(Capability::non_empty_file(&dest)),
                );
            }
        }

        // =========================================================
        // Phase 6: Fuzzy Finder
        // =========================================================
        if config.fuzzy_finder {
            let fzf_dir = config.fzf_dir();
            // Source install is a nested step with its own precondition.
            let from_source = Step::new(
                "install fzf from source",
                ShellCommand::sh(
                    "clone fzf and run its installer",
                    format!(
                        "git clone --depth 1 {FZF_REPO} '{0}' && '{0}/install' --key-bindings --completion --no-update-rc",
                        fzf_dir.display()
                    ),
                    timeout,
                ),
            )
            .unless(Capability::directory(&fzf_dir));

            manifest.add_step(
                package_step("Install fzf", &["fzf"], managers, timeout)
                    .or_else(from_source)
                    .unless(Capability::executable("fzf")),
            );
        }

        // =========================================================
        // Phase 7: File-Listing Tools
        // =========================================================
        if config.listing_tools {
            // exa is the differently-named predecessor package still
            // shipped by older distributions.
            manifest.add_step(
                package_step("Install eza", &["eza", "exa"], managers, timeout)
                    .unless(Capability::executable("eza")),
            );
            manifest.add_step(
                package_step("Install bat", &["bat"], managers, timeout)
                    .unless(Capability::executable("bat")),
            );
        }

        // =========================================================
        // Phase 8: Editor
        // =========================================================
        let editor_only = [config.editor.as_str()];
        let editor_packages: &[&str] = if config.editor == "neovim" {
            &["neovim", "vim"]
        } else {
            &editor_only
        };
        let editor_exe = if config.editor == "neovim" { "nvim" } else { &config.editor };
        manifest.add_step(
            package_step(
                format!("Install {}", config.editor),
                editor_packages,
                managers,
                timeout,
            )
            .unless(Capability::executable(editor_exe)),
        );

        // =========================================================
        // Phase 9: Managed Configuration File
        // =========================================================
        let zshrc = config.zshrc_path();
        manifest.add_step(
            Step::new(
                "Write .zshrc",
                WriteManagedFile::new(&zshrc, config.zshrc_content.as_str()).with_mode(0o644),
            )
            .unless(Capability::file_with_content(&zshrc, &config.zshrc_content))
            .required(),
        );

        // =========================================================
        // Phase 10: Default Shell
        // =========================================================
        if config.change_default_shell {
            manifest.add_step(Step::new(
                "Set zsh as default shell",
                ShellCommand::sh(
                    "change login shell to zsh",
                    "chsh -s \"$(command -v zsh)\"",
                    timeout,
                ),
            ));
        }

        manifest
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one install step trying every (package name, manager) pair:
/// all managers for the first name, then all managers for each
/// alternative name, in declaration order.
fn package_step(
    name: impl Into<String>,
    packages: &[&str],
    managers: &[PackageManager],
    timeout: Duration,
) -> Step {
    let mut step = Step::new(name, PackageInstall::new(managers[0], packages[0], timeout));
    for (i, package) in packages.iter().enumerate() {
        for (j, manager) in managers.iter().enumerate() {
            if i == 0 && j == 0 {
                continue;
            }
            step = step.or_else(PackageInstall::new(*manager, *package, timeout));
        }
    }
    step
}

/// Resolve a plugin entry to (directory name, clone URL). Bare names are
/// looked up under the zsh-users organization; `owner/name` slugs go to
/// that repository.
fn plugin_source(entry: &str) -> (String, String) {
    if let Some((_, name)) = entry.rsplit_once('/') {
        (name.to_string(), format!("https://github.com/{entry}.git"))
    } else {
        (
            entry.to_string(),
            format!("https://github.com/zsh-users/{entry}.git"),
        )
    }
}
