//! Fixed SD card layout
//!
//! Everything the launcher reads or writes hangs off a single root:
//! `Roms/<emu>/...`, `Emus/<emu>.pak/launch.sh`, `Games/*.pak`, `Tools/*.pak`,
//! `Update.pak`, the update archive, the recents file and the queued command.

use std::path::{Path, PathBuf};

/// Directory suffix that marks a launchable package
pub const PAK_SUFFIX: &str = ".pak";

/// Script every package must contain to be launchable
pub const LAUNCH_SCRIPT: &str = "launch.sh";

/// Name of the synthetic recents folder shown at the top of the root listing
pub const RECENTLY_PLAYED: &str = "Recently Played";

/// Update archives at or below this size are treated as absent
pub const MIN_UPDATE_SIZE: u64 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// SD card root
    pub root: PathBuf,
    /// Last-session file (single path)
    pub last_path: PathBuf,
    /// File the launch command is queued into
    pub next_command: PathBuf,
    /// Newline-delimited recents list
    pub recents_file: PathBuf,
    /// Firmware update archive
    pub update_archive: PathBuf,
}

impl Layout {
    /// Layout with every file at its default location under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            last_path: PathBuf::from("/tmp/last.txt"),
            next_command: root.join("System.pak").join("next.sh"),
            recents_file: root.join("recent.txt"),
            update_archive: root.join("TrimuiUpdate_MinUI.zip"),
            root,
        }
    }

    pub fn roms_dir(&self) -> PathBuf {
        self.root.join("Roms")
    }

    pub fn emus_dir(&self) -> PathBuf {
        self.root.join("Emus")
    }

    pub fn games_dir(&self) -> PathBuf {
        self.root.join("Games")
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join("Tools")
    }

    pub fn update_pak(&self) -> PathBuf {
        self.root.join(format!("Update{}", PAK_SUFFIX))
    }

    /// Identifier of the synthetic recents folder.
    /// It never exists on disk; it is only matched against entry paths.
    pub fn recently_played(&self) -> PathBuf {
        self.root.join(RECENTLY_PLAYED)
    }

    /// `Emus/<name>.pak/launch.sh` for the ROM folder `Roms/<name>`
    pub fn emulator_script(&self, rom_folder: &Path) -> Option<PathBuf> {
        let name = rom_folder.file_name()?.to_string_lossy();
        Some(
            self.emus_dir()
                .join(format!("{}{}", name, PAK_SUFFIX))
                .join(LAUNCH_SCRIPT),
        )
    }

    /// Launch script of the emulator responsible for a title under `Roms/`.
    /// The emulator is named by the first folder below the ROM root.
    pub fn emulator_for_title(&self, title: &Path) -> Option<PathBuf> {
        let relative = title.strip_prefix(self.roms_dir()).ok()?;
        let mut components = relative.components();
        let system = components.next()?;
        // The title itself must sit somewhere inside the system folder
        components.next()?;
        self.emulator_script(Path::new(system.as_os_str()))
    }

    /// Whether `path` is the root itself or lies beneath it
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locations() {
        let layout = Layout::new("/mnt/SDCARD");
        assert_eq!(layout.recents_file, PathBuf::from("/mnt/SDCARD/recent.txt"));
        assert_eq!(layout.next_command, PathBuf::from("/mnt/SDCARD/System.pak/next.sh"));
        assert_eq!(layout.update_pak(), PathBuf::from("/mnt/SDCARD/Update.pak"));
        assert_eq!(layout.recently_played(), PathBuf::from("/mnt/SDCARD/Recently Played"));
    }

    #[test]
    fn test_emulator_for_title() {
        let layout = Layout::new("/mnt/SDCARD");
        assert_eq!(
            layout.emulator_for_title(Path::new("/mnt/SDCARD/Roms/GB/Tetris.gb")),
            Some(PathBuf::from("/mnt/SDCARD/Emus/GB.pak/launch.sh"))
        );
        assert_eq!(
            layout.emulator_for_title(Path::new("/mnt/SDCARD/Roms/GBA/RPG/Golden Sun.gba")),
            Some(PathBuf::from("/mnt/SDCARD/Emus/GBA.pak/launch.sh"))
        );
        assert_eq!(layout.emulator_for_title(Path::new("/mnt/SDCARD/Roms/GB")), None);
        assert_eq!(layout.emulator_for_title(Path::new("/mnt/SDCARD/Games/x.gb")), None);
    }
}
