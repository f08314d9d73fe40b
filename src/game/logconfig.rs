// game/logconfig.rs - keep the game's log.config set up for network logging
//
// The net logger is only written when the [Network] section of log.config
// carries the right keys. The patcher rewrites the file in place, touching
// nothing but the three keys it owns.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_CONFIG_DIR: &str = "drive_c/users/steamuser/AppData/Local/Blizzard/Hearthstone";
const LOG_CONFIG_NAME: &str = "log.config";

/// Keys the [Network] section must carry for GameNetLogger.log to appear.
const REQUIRED_KEYS: [(&str, &str); 3] = [
    ("LogLevel", "1"),
    ("FilePrinting", "true"),
    ("Verbose", "true"),
];

/// Locate (or bootstrap) log.config under a Proton prefix and make sure the
/// [Network] section carries the required keys. Returns the config path, or
/// `None` when the directory cannot be prepared or written.
pub fn ensure_log_config(prefix: &Path) -> Option<PathBuf> {
    let cfg_dir = prefix.join(LOG_CONFIG_DIR);
    fs::create_dir_all(&cfg_dir).ok()?;
    let cfg_path = cfg_dir.join(LOG_CONFIG_NAME);

    let existing = fs::read_to_string(&cfg_path).unwrap_or_default();
    let (patched, changed) = patch_network_section(&existing);

    if changed || !cfg_path.exists() {
        fs::write(&cfg_path, patched).ok()?;
        info!("Updated {}", cfg_path.display());
    }

    Some(cfg_path)
}

/// Patch the [Network] section of an INI-style document. Returns the new
/// text and whether anything actually changed. Unrelated sections, keys and
/// comments are preserved verbatim.
fn patch_network_section(content: &str) -> (String, bool) {
    let mut out: Vec<String> = Vec::new();
    let mut changed = false;
    let mut in_network = false;
    // Index in `out` just past the last line belonging to [Network].
    let mut network_end: Option<usize> = None;
    let mut seen: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_network = trimmed.eq_ignore_ascii_case("[Network]");
            out.push(line.to_string());
            if in_network {
                network_end = Some(out.len());
            }
            continue;
        }

        if in_network {
            if let Some((key, value)) = split_key_value(line)
                && let Some(&(canonical, wanted)) = REQUIRED_KEYS
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
            {
                seen.push(canonical);
                if value != wanted {
                    out.push(format!("{}={}", canonical, wanted));
                    changed = true;
                    network_end = Some(out.len());
                    continue;
                }
            }
            out.push(line.to_string());
            network_end = Some(out.len());
            continue;
        }

        out.push(line.to_string());
    }

    let missing: Vec<(&str, &str)> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|(k, _)| !seen.contains(k))
        .collect();

    if !missing.is_empty() {
        let insert_at = match network_end {
            Some(idx) => idx,
            None => {
                out.push("[Network]".to_string());
                out.len()
            }
        };
        for (offset, (key, value)) in missing.iter().enumerate() {
            out.insert(insert_at + offset, format!("{}={}", key, value));
        }
        changed = true;
    }

    let mut text = out.join("\n");
    text.push('\n');
    (text, changed)
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstraps_empty_file() {
        let (text, changed) = patch_network_section("");
        assert!(changed);
        assert!(text.starts_with("[Network]\n"));
        assert!(text.contains("LogLevel=1\n"));
        assert!(text.contains("FilePrinting=true\n"));
        assert!(text.contains("Verbose=true\n"));
    }

    #[test]
    fn idempotent_on_complete_section() {
        let (text, changed) = patch_network_section("");
        let (again, changed_again) = patch_network_section(&text);
        assert!(changed);
        assert!(!changed_again);
        assert_eq!(text, again);
    }

    #[test]
    fn fixes_wrong_value_in_place() {
        let input = "[Network]\nLogLevel=0\nFilePrinting=true\nVerbose=true\n";
        let (text, changed) = patch_network_section(input);
        assert!(changed);
        assert!(text.contains("LogLevel=1\n"));
        assert!(!text.contains("LogLevel=0"));
    }

    #[test]
    fn preserves_unrelated_content() {
        let input = concat!(
            "# tuned by hand\n",
            "[Power]\n",
            "LogLevel=255\n",
            "\n",
            "[Network]\n",
            "LogLevel=1\n",
            "FilePrinting=true\n",
            "Verbose=true\n",
            "[Zone]\n",
            "Verbose=false\n",
        );
        let (text, changed) = patch_network_section(input);
        assert!(!changed);
        assert!(text.contains("# tuned by hand\n"));
        assert!(text.contains("[Power]\nLogLevel=255\n"));
        assert!(text.contains("[Zone]\nVerbose=false\n"));
    }

    #[test]
    fn appends_missing_keys_inside_section() {
        let input = "[Network]\nLogLevel=1\n\n[Zone]\nVerbose=false\n";
        let (text, changed) = patch_network_section(input);
        assert!(changed);
        // The new keys land in [Network], not after [Zone].
        let network_pos = text.find("[Network]").unwrap();
        let zone_pos = text.find("[Zone]").unwrap();
        let printing_pos = text.find("FilePrinting=true").unwrap();
        assert!(network_pos < printing_pos && printing_pos < zone_pos);
    }

    #[test]
    fn ensure_writes_and_is_stable() {
        let prefix = tempfile::tempdir().expect("temp dir");
        let path = ensure_log_config(prefix.path()).expect("config created");
        assert!(path.exists());

        let first = fs::read_to_string(&path).expect("read");
        let path_again = ensure_log_config(prefix.path()).expect("config kept");
        let second = fs::read_to_string(&path_again).expect("read");
        assert_eq!(first, second);
    }
}
