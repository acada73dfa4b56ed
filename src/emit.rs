use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::config::State;
use crate::version::VersionSet;

/// Hold-off before bumping the touch target so it lands strictly after the
/// artifacts written earlier in the run.
const TOUCH_DELAY: Duration = Duration::from_millis(10);

/// Symbols exposed by the C header and source pair, in emission order.
const SYMBOLS: [&str; 11] = [
    "git_version1",
    "git_version2",
    "git_version3",
    "git_version4",
    "git_major",
    "git_minor",
    "git_patch",
    "git_hash",
    "build_time",
    "build_user",
    "build_hostname",
];

fn symbol_values<'a>(
    v: &'a VersionSet,
    hash: &'a str,
    state: &'a State,
    time: &'a str,
) -> [&'a str; 11] {
    [
        &v.version1,
        &v.version2,
        &v.version3,
        &v.version4,
        &v.major,
        &v.minor,
        &v.patch,
        hash,
        time,
        &state.user,
        &state.hostname,
    ]
}

/// C header declaring the version symbols. Depends only on the project
/// name, so its bytes are stable across builds.
pub fn render_header(name: &str) -> String {
    let guard = format!(
        "__RUBY_AUTOGENERATED_VERSION_FILE_FOR_{}",
        name.to_uppercase()
    );
    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n", guard));
    out.push_str(&format!("#define {}\n", guard));
    for sym in SYMBOLS {
        out.push_str(&format!("extern const char {}[];\n", sym));
    }
    out.push_str("#endif\n");
    out
}

/// C source defining the version symbols.
pub fn render_source(v: &VersionSet, hash: &str, state: &State) -> String {
    let time = state.time.to_string();
    let mut out = String::new();
    for (sym, val) in SYMBOLS.iter().zip(symbol_values(v, hash, state, &time)) {
        out.push_str(&format!("const char {}[] = \"{}\";\n", sym, val));
    }
    out
}

/// CMake variable assignments. Column padding after VERSION and HASH
/// matches what consumers of these files already parse.
pub fn render_cmake(name: &str, v: &VersionSet, hash: &str, state: &State) -> String {
    let mut out = String::new();
    out.push_str(&format!("set({}_VERSION  \"{}\")\n", name, v.version4));
    out.push_str(&format!("set({}_VERSION1 \"{}\")\n", name, v.version1));
    out.push_str(&format!("set({}_VERSION2 \"{}\")\n", name, v.version2));
    out.push_str(&format!("set({}_VERSION3 \"{}\")\n", name, v.version3));
    out.push_str(&format!("set({}_VERSION4 \"{}\")\n", name, v.version4));
    out.push_str(&format!("set({}_VERSION_MAJOR \"{}\")\n", name, v.major));
    out.push_str(&format!("set({}_VERSION_MINOR \"{}\")\n", name, v.minor));
    out.push_str(&format!("set({}_VERSION_PATCH \"{}\")\n", name, v.patch));
    out.push_str(&format!("set({}_HASH     \"{}\")\n", name, hash));
    out.push_str(&format!("set({}_BUILD_TIME \"{}\")\n", name, state.time));
    out.push_str(&format!("set({}_BUILD_USER \"{}\")\n", name, state.user));
    out.push_str(&format!("set({}_BUILD_HOSTNAME \"{}\")\n", name, state.hostname));
    out
}

/// Writes `content` only when it differs from what is on disk, preserving
/// the target's mtime on no-op runs. A missing or unreadable file always
/// counts as different. Returns whether a write happened.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    let prior = fs::read(path).unwrap_or_default();
    if prior == content.as_bytes() {
        return Ok(false);
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}

/// Bumps the target's mtime, creating it empty if absent. The delay keeps
/// its timestamp strictly newer than everything written before it.
pub fn touch(path: &Path) -> Result<()> {
    thread::sleep(TOUCH_DELAY);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("touching {}", path.display()))?;
    file.set_modified(SystemTime::now())
        .with_context(|| format!("updating mtime of {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_versions() -> VersionSet {
        VersionSet {
            version1: "1".into(),
            version2: "1.2".into(),
            version3: "1.2.3".into(),
            version4: "1.2.3.0".into(),
            major: "1".into(),
            minor: "2".into(),
            patch: "3".into(),
        }
    }

    fn sample_state() -> State {
        State {
            name: "demo".into(),
            localcnt: 1,
            time: 1_700_000_000,
            user: "alice".into(),
            hostname: "build-host".into(),
            gitrev: "1.2-3-g1a2b3c4".into(),
        }
    }

    #[test]
    fn test_render_header() {
        let want = "\
#ifndef __RUBY_AUTOGENERATED_VERSION_FILE_FOR_DEMO
#define __RUBY_AUTOGENERATED_VERSION_FILE_FOR_DEMO
extern const char git_version1[];
extern const char git_version2[];
extern const char git_version3[];
extern const char git_version4[];
extern const char git_major[];
extern const char git_minor[];
extern const char git_patch[];
extern const char git_hash[];
extern const char build_time[];
extern const char build_user[];
extern const char build_hostname[];
#endif
";
        assert_eq!(render_header("demo"), want);
    }

    #[test]
    fn test_render_source() {
        let want = "\
const char git_version1[] = \"1\";
const char git_version2[] = \"1.2\";
const char git_version3[] = \"1.2.3\";
const char git_version4[] = \"1.2.3.0\";
const char git_major[] = \"1\";
const char git_minor[] = \"2\";
const char git_patch[] = \"3\";
const char git_hash[] = \"1a2b3c4d\";
const char build_time[] = \"1700000000\";
const char build_user[] = \"alice\";
const char build_hostname[] = \"build-host\";
";
        assert_eq!(
            render_source(&sample_versions(), "1a2b3c4d", &sample_state()),
            want
        );
    }

    #[test]
    fn test_render_cmake() {
        let want = "\
set(demo_VERSION  \"1.2.3.0\")
set(demo_VERSION1 \"1\")
set(demo_VERSION2 \"1.2\")
set(demo_VERSION3 \"1.2.3\")
set(demo_VERSION4 \"1.2.3.0\")
set(demo_VERSION_MAJOR \"1\")
set(demo_VERSION_MINOR \"2\")
set(demo_VERSION_PATCH \"3\")
set(demo_HASH     \"1a2b3c4d\")
set(demo_BUILD_TIME \"1700000000\")
set(demo_BUILD_USER \"alice\")
set(demo_BUILD_HOSTNAME \"build-host\")
";
        assert_eq!(
            render_cmake("demo", &sample_versions(), "1a2b3c4d", &sample_state()),
            want
        );
    }

    #[test]
    fn test_header_guard_follows_name() {
        let header = render_header("my_proj");
        assert!(header.starts_with("#ifndef __RUBY_AUTOGENERATED_VERSION_FILE_FOR_MY_PROJ\n"));
    }

    #[test]
    fn test_write_if_changed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.h");

        // Missing file is always written.
        assert!(write_if_changed(&path, "one\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\n");

        // Identical content is left alone.
        assert!(!write_if_changed(&path, "one\n").unwrap());

        // Different content is replaced.
        assert!(write_if_changed(&path, "two\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");
    }

    #[test]
    fn test_write_if_changed_preserves_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.h");

        write_if_changed(&path, "stable\n").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        thread::sleep(Duration::from_millis(20));
        write_if_changed(&path, "stable\n").unwrap();
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_touch_creates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stamp");

        touch(&path).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_touch_bumps_mtime_without_truncating() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stamp");
        fs::write(&path, "contents\n").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        touch(&path).unwrap();
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(after > before);
        assert_eq!(fs::read_to_string(&path).unwrap(), "contents\n");
    }
}
