// Unit tests for domain models

use super::*;
use crate::domain::errors::ErrorKind;

#[test]
fn test_time_spec_parse_seconds() {
    let time = TimeSpec::parse("123.456").unwrap();
    assert_eq!(time.seconds, 123.456);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    let time = TimeSpec::parse("01:30.5").unwrap();
    assert_eq!(time.seconds, 90.5);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    let time = TimeSpec::parse("01:02:03.5").unwrap();
    assert_eq!(time.seconds, 3723.5);
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("00:60").is_err());
    assert!(TimeSpec::parse("01:60:00").is_err());
    assert!(TimeSpec::parse("-10").is_err());
    assert!(TimeSpec::parse("NaN").is_err());
    assert!(TimeSpec::parse("1:2:3:4").is_err());
}

#[test]
fn test_time_spec_display() {
    let time = TimeSpec::from_components(1, 2, 3, 456);
    assert_eq!(format!("{}", time), "01:02:03.456");

    let time_no_hours = TimeSpec::from_components(0, 2, 3, 456);
    assert_eq!(format!("{}", time_no_hours), "02:03.456");
}

#[test]
fn test_cut_request_validation() {
    let request = CutRequest::new("demo", "clip.mp4", 0.0, 5.0).unwrap();
    assert_eq!(request.folder(), "demo");
    assert_eq!(request.file_name(), "clip.mp4");
    assert_eq!(request.identity(), &VideoIdentity::new("demo", "clip.mp4"));

    for (start, duration) in [(-1.0, 5.0), (0.0, 0.0), (0.0, -2.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
        let err = CutRequest::new("demo", "clip.mp4", start, duration).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}

#[test]
fn test_identity_does_not_collide_on_separator() {
    let a = VideoIdentity::new("a_b", "c.mp4");
    let b = VideoIdentity::new("a", "b_c.mp4");
    assert_ne!(a, b);
    assert_eq!(a.to_string(), "a_b/c.mp4");
}

#[test]
fn test_cut_state_transitions() {
    let running = CutState::Pending.advance(CutState::Running).unwrap();
    assert_eq!(running, CutState::Running);
    assert!(running.advance(CutState::Succeeded).unwrap().is_terminal());
    assert!(CutState::Pending.advance(CutState::Failed).is_ok());

    assert!(CutState::Succeeded.advance(CutState::Running).is_err());
    assert!(CutState::Failed.advance(CutState::Succeeded).is_err());
    assert!(CutState::Pending.advance(CutState::Succeeded).is_err());
}

#[test]
fn test_trim_invocation_argument_order() {
    let invocation = TrimInvocation {
        program: PathBuf::from("ffmpeg"),
        input: PathBuf::from("/videos/demo/clip.mp4"),
        output: PathBuf::from("/cuts/2024-05-01/cut_1_clip.mp4"),
        start_seconds: 2.0,
        duration_seconds: 5.5,
    };

    assert_eq!(
        invocation.args(),
        vec![
            "-ss",
            "2",
            "-i",
            "/videos/demo/clip.mp4",
            "-t",
            "5.5",
            "-c",
            "copy",
            "/cuts/2024-05-01/cut_1_clip.mp4"
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_trim_invocation_keeps_non_utf8_paths() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let input = PathBuf::from(OsStr::from_bytes(b"/videos/demo/clip\xff.mp4"));
    let invocation = TrimInvocation {
        program: PathBuf::from("ffmpeg"),
        input: input.clone(),
        output: PathBuf::from("/cuts/out.mp4"),
        start_seconds: 0.0,
        duration_seconds: 1.0,
    };

    let args = invocation.args();
    assert_eq!(args[3], input.into_os_string());
    assert_eq!(args[3].as_bytes(), b"/videos/demo/clip\xff.mp4");
}
