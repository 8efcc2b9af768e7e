// ## src/constants.rs

//! Protocol constants for the encrypted scatter container and the file names
//! the variant pipeline reads and writes.
//!
//! These are vendor values. They are hardcoded, not configuration.

/// Passphrase fed to the key derivation together with the container salt.
pub const KDF_PASSPHRASE: &[u8] = b"OSD";
/// Total SHA-256 rounds of the key derivation (first hash included).
pub const KDF_ITERATIONS: usize = 1000;

/// Frame magic that follows the length field in the decrypted frame.
pub const FRAME_SIGNATURE: [u8; 8] = [0xCF, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0xFC];

/// Container layout.
pub const IV_LEN: usize = 16;
pub const SALT_LEN: usize = 16;
pub const KEY_LEN_32: usize = 32;
pub const AES_BLOCK_LEN: usize = 16;
/// IV + salt + at least two cipher blocks.
pub const MIN_CONTAINER_LEN: usize = 64;

/// Decrypted frame layout.
pub const FRAME_LEN_FIELD: usize = 8;
pub const FRAME_SIG_FIELD: usize = 8;
pub const FRAME_DIGEST_LEN: usize = 32;
/// length + signature + digest, with an empty payload.
pub const MIN_FRAME_LEN: usize = FRAME_LEN_FIELD + FRAME_SIG_FIELD + FRAME_DIGEST_LEN;

/// Scatter file naming.
pub mod names {
    pub const CONTAINER_SUFFIX: &str = "_Android_scatter.x";
    pub const FINAL_SUFFIX: &str = "_Android_scatter.xml";
    /// Intermediate plaintext copy (diagnostics).
    pub const PLAINTEXT_TEMP: &str = "Android_scatter.xml";
    /// Dual-slot duplicate consumed by the flashing tool's A/B logic.
    pub const DUAL_SLOT_TEMP: &str = "Android_scatter_A,B.xml";

    pub const FLASH_MANIFEST: &str = "flash.xml";
    pub const AUTH_BUNDLE: &str = "da.auth";
    pub const TOOL_HISTORY: &str = "history.ini";
    pub const PROINFO_DUMP: &str = "proinfo";
    /// Bootloader images replaced from the PRC directory before flashing.
    pub const PRC_IMAGES: [&str; 2] = ["lk.img", "dtbo.img"];
}

/// Manifest element names.
pub mod elements {
    pub const PARTITION_RECORD: &str = "partition_index";
    pub const PARTITION_NAME: &str = "partition_name";
    pub const FILE_NAME: &str = "file_name";
    pub const IS_DOWNLOAD: &str = "is_download";
    pub const IS_UPGRADABLE: &str = "is_upgradable";
}

/// Device properties read through the bridge.
pub mod props {
    pub const PLATFORM: &str = "ro.vendor.mediatek.platform";
    pub const REGION: &str = "ro.config.zui.region";
    pub const HW_VERSION: &str = "ro.vendor.config.lgsi.hw.version";
    pub const CPU_INFO: &str = "ro.vendor.config.lgsi.cpuinfo";
}

/// Tool history keys rewritten before launching the flashing tool.
pub mod history_keys {
    pub const FLASH_XML: &str = "flashxmlHistory=";
    pub const AUTH_DIR: &str = "lastAuthDir=";
}
