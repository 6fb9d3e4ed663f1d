use ahatouch_core::Difficulty;

pub(crate) const SETTINGS_VERSION: u32 = 1;
pub(crate) const SETTINGS_KEY: &str = "settings.v1";

#[derive(Clone, Debug, PartialEq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct SettingsBlob {
    pub(crate) version: u32,
    pub(crate) sound_enabled: bool,
    pub(crate) last_difficulty: String,
}

impl SettingsBlob {
    pub(crate) fn difficulty(&self) -> Difficulty {
        Difficulty::from_key(&self.last_difficulty).unwrap_or_default()
    }
}

impl Default for SettingsBlob {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            sound_enabled: true,
            last_difficulty: Difficulty::default().key().to_string(),
        }
    }
}
