use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Launch-at-login hooks. The core keeps no autostart state of its own: it
/// queries and commands an OS-integration provider through this trait.
pub trait AutostartProvider {
    fn is_enabled(&self) -> Result<bool>;
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// File-based provider: records launch-at-login by writing the platform's
/// autostart artifact for the current executable, and removes it to disable.
pub struct FileAutostart {
    entry_path: PathBuf,
}

impl FileAutostart {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entry_path: platform_entry_path()?,
        })
    }

    /// Provider rooted at an explicit entry path (used by tests)
    pub fn at(entry_path: impl Into<PathBuf>) -> Self {
        Self {
            entry_path: entry_path.into(),
        }
    }

    pub fn entry_path(&self) -> &PathBuf {
        &self.entry_path
    }
}

impl AutostartProvider for FileAutostart {
    fn is_enabled(&self) -> Result<bool> {
        Ok(self.entry_path.exists())
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            if let Some(parent) = self.entry_path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            fs::write(&self.entry_path, entry_contents()?).with_context(|| {
                format!(
                    "Failed to write autostart entry: {}",
                    self.entry_path.display()
                )
            })?;
        } else if self.entry_path.exists() {
            fs::remove_file(&self.entry_path).with_context(|| {
                format!(
                    "Failed to remove autostart entry: {}",
                    self.entry_path.display()
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_entry_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine user config directory")?;
    Ok(config.join("autostart").join("perch.desktop"))
}

#[cfg(target_os = "macos")]
fn platform_entry_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join("Library")
        .join("LaunchAgents")
        .join("io.perch.widget.plist"))
}

#[cfg(windows)]
fn platform_entry_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine user config directory")?;
    Ok(config
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join("Startup")
        .join("perch.cmd"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn entry_contents() -> Result<String> {
    let exe = std::env::current_exe().context("Could not determine executable path")?;
    Ok(format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=Perch\n\
         Exec={}\n\
         X-GNOME-Autostart-enabled=true\n",
        exe.display()
    ))
}

#[cfg(target_os = "macos")]
fn entry_contents() -> Result<String> {
    let exe = std::env::current_exe().context("Could not determine executable path")?;
    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>io.perch.widget</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        exe.display()
    ))
}

#[cfg(windows)]
fn entry_contents() -> Result<String> {
    let exe = std::env::current_exe().context("Could not determine executable path")?;
    Ok(format!("start \"\" \"{}\"\r\n", exe.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_enable_writes_entry_for_current_exe() {
        let dir = tempdir().unwrap();
        let provider = FileAutostart::at(dir.path().join("autostart").join("perch.entry"));

        assert!(!provider.is_enabled().unwrap());

        provider.set_enabled(true).unwrap();
        assert!(provider.is_enabled().unwrap());

        let contents = std::fs::read_to_string(provider.entry_path()).unwrap();
        let exe = std::env::current_exe().unwrap();
        assert!(contents.contains(&exe.display().to_string()));
    }

    #[test]
    fn test_disable_removes_entry() {
        let dir = tempdir().unwrap();
        let provider = FileAutostart::at(dir.path().join("perch.entry"));

        provider.set_enabled(true).unwrap();
        provider.set_enabled(false).unwrap();

        assert!(!provider.is_enabled().unwrap());
        // Disabling an absent entry is a no-op, not an error
        provider.set_enabled(false).unwrap();
    }
}
