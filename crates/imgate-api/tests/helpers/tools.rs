//! Shell scripts standing in for ffmpeg and pngloss.
//!
//! The fake ffmpeg copies the file after `-i` to its last argument and then
//! appends `|<arg>` for every argument, so tests can see which command line was
//! used. The fake pngloss (`-o <out> <in>`) copies and appends `|pngloss`.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const FAKE_FFMPEG: &str = r#"#!/bin/sh
in="$2"
for last in "$@"; do :; done
cp "$in" "$last" && printf '|%s' "$@" >> "$last"
"#;

const FAKE_PNG_COMPRESSOR: &str = r#"#!/bin/sh
cp "$3" "$2" && printf '|pngloss' >> "$2"
"#;

const FAILING_TOOL: &str = "#!/bin/sh\necho 'Invalid data found when processing input' >&2\nexit 1\n";

/// Exits 0 without writing anything
const SILENT_TOOL: &str = "#!/bin/sh\nexit 0\n";

const SLOW_TOOL: &str = "#!/bin/sh\nsleep 30\n";

pub struct FakeTools {
    _dir: TempDir,
    pub ffmpeg: String,
    pub pngloss: String,
    pub failing: String,
    pub silent: String,
    pub slow: String,
}

fn write_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake tool executable");
    path.to_string_lossy().to_string()
}

impl FakeTools {
    pub fn install() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create tools dir");
        Self {
            ffmpeg: write_tool(dir.path(), "ffmpeg", FAKE_FFMPEG),
            pngloss: write_tool(dir.path(), "pngloss", FAKE_PNG_COMPRESSOR),
            failing: write_tool(dir.path(), "failing-tool", FAILING_TOOL),
            silent: write_tool(dir.path(), "silent-tool", SILENT_TOOL),
            slow: write_tool(dir.path(), "slow-tool", SLOW_TOOL),
            _dir: dir,
        }
    }
}
