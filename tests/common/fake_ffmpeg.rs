//! Shell script standing in for ffmpeg.
//!
//! Probe mode (`-hide_banner -i <input>`) prints a canned stream listing with
//! a 60 second duration. Transcode mode prints `time=` status lines ending in
//! carriage returns, creates the output file and appends the input to
//! `runs.log` next to it. Input names steer the failure cases:
//!
//! - `*nostreams*`: probe finds nothing
//! - `*noduration*`: probe reports `Duration: N/A`
//! - `*fail*`: transcode exits 1 after printing progress

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const SCRIPT: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 6.1-fake Copyright (c) 2000-2023 the FFmpeg developers"
  exit 0
fi

if [ "$1" = "-hide_banner" ]; then
  input="$3"
  case "$input" in
    *nostreams*)
      echo "$input: Invalid data found when processing input" >&2
      exit 1
      ;;
  esac
  echo "Input #0, matroska,webm, from '$input':" >&2
  case "$input" in
    *noduration*) echo "  Duration: N/A, start: 0.000000, bitrate: N/A" >&2 ;;
    *) echo "  Duration: 00:01:00.00, start: 0.000000, bitrate: 8000 kb/s" >&2 ;;
  esac
  echo "  Stream #0:0(eng): Video: h264 (High), yuv420p(progressive), 1920x1080, 23.98 fps" >&2
  echo "  Stream #0:1(eng): Audio: aac (LC), 48000 Hz, stereo, fltp (default)" >&2
  echo "  Stream #0:2(jpn): Audio: aac (LC), 48000 Hz, stereo, fltp" >&2
  echo "  Stream #0:3(eng): Subtitle: subrip" >&2
  echo "At least one output file must be specified" >&2
  exit 1
fi

input="$3"
for out; do :; done

printf 'frame=  100 fps= 50 q=23.0 size=    1024kB time=00:00:15.00 bitrate=N/A speed=2x\r' >&2
printf 'frame=  200 fps= 50 q=23.0 size=    2048kB time=00:00:30.00 bitrate=N/A speed=2x\r' >&2
case "$input" in
  *fail*)
    echo "" >&2
    echo "Error while processing the decoded data for stream #0:0" >&2
    exit 1
    ;;
esac
printf 'frame=  400 fps= 50 q=-1.0 Lsize=    4096kB time=00:01:00.00 bitrate=N/A speed=2x\n' >&2
: > "$out"
echo "$input" >> "$(dirname "$out")/runs.log"
exit 0
"#;

/// Path of the fake ffmpeg, written once per test binary
pub fn fake_ffmpeg() -> &'static Path {
    static PATH: OnceLock<PathBuf> = OnceLock::new();

    PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("mkvconv-fake-ffmpeg-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create fake ffmpeg dir");
        let path = dir.join("ffmpeg");
        fs::write(&path, SCRIPT).expect("write fake ffmpeg");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("make fake ffmpeg executable");
        }

        path
    })
}

/// Lines of `runs.log` in `output_dir`: the inputs transcoded, in order
pub fn transcoded_inputs(output_dir: &Path) -> Vec<String> {
    fs::read_to_string(output_dir.join("runs.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
