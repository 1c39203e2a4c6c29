//! Well-known bus addresses for systemd and the tuned daemon.

/// Systemd service manager bus name.
pub const SYSTEMD_DEST: &str = "org.freedesktop.systemd1";

/// Interface carrying `Start`, `Stop` and the `ActiveState` property.
pub const SYSTEMD_UNIT_INTERFACE: &str = "org.freedesktop.systemd1.Unit";

const SYSTEMD_UNIT_PATH_PREFIX: &str = "/org/freedesktop/systemd1/unit/";

/// Well-known bus name for the tuned daemon.
pub const TUNED_DEST: &str = "com.redhat.tuned";

/// Object path for the tuned control interface.
pub const TUNED_PATH: &str = "/Tuned";

/// Tuned control interface.
pub const TUNED_INTERFACE: &str = "com.redhat.tuned.control";

/// Transaction mode used for unit start/stop jobs.
pub const JOB_MODE_REPLACE: &str = "replace";

/// Object path systemd exposes for `unit`.
///
/// Applies systemd's bus path escaping: any byte outside `[A-Za-z0-9]`, and a
/// leading digit, becomes `_xx` in lowercase hex.
pub fn unit_object_path(unit: &str) -> String {
    let mut path = String::with_capacity(SYSTEMD_UNIT_PATH_PREFIX.len() + unit.len() * 3);
    path.push_str(SYSTEMD_UNIT_PATH_PREFIX);

    if unit.is_empty() {
        path.push('_');
        return path;
    }

    for (i, byte) in unit.bytes().enumerate() {
        let plain = byte.is_ascii_alphabetic() || (byte.is_ascii_digit() && i > 0);
        if plain {
            path.push(byte as char);
        } else {
            path.push_str(&format!("_{:02x}", byte));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuned_unit_path() {
        assert_eq!(
            unit_object_path("tuned.service"),
            "/org/freedesktop/systemd1/unit/tuned_2eservice"
        );
    }

    #[test]
    fn test_unit_path_escapes_dash_and_leading_digit() {
        assert_eq!(
            unit_object_path("tuned-ppd.service"),
            "/org/freedesktop/systemd1/unit/tuned_2dppd_2eservice"
        );
        assert_eq!(
            unit_object_path("9p.service"),
            "/org/freedesktop/systemd1/unit/_39p_2eservice"
        );
    }

    #[test]
    fn test_unit_path_keeps_inner_digits() {
        assert_eq!(
            unit_object_path("a1.service"),
            "/org/freedesktop/systemd1/unit/a1_2eservice"
        );
    }

    #[test]
    fn test_empty_unit_path() {
        assert_eq!(unit_object_path(""), "/org/freedesktop/systemd1/unit/_");
    }
}
