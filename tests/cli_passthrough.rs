use std::io::Write;
use std::process::{Command, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_osk_image");

fn run_with_stdin(dir: &std::path::Path, out_dir: &str, input: &str) -> std::process::Output {
    let mut child = Command::new(BIN)
        .current_dir(dir)
        .env_remove("OSK_IMAGE_CONFIG")
        .env_remove("OSK_IMAGE_PREFIX")
        .env("OSK_IMAGE_OUTPUT_DIR", out_dir)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn osk_image");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

#[test]
fn passes_through_diagnostics_and_writes_frames() {
    let dir = tempfile::tempdir().unwrap();
    let input = "analyze tb.vhdl\n\
                 tb.vhdl:50:5:@1ns:(report note): PIXEL:0:0:ff:00:00\n\
                 tb.vhdl:60:5:@2ns:(report note): PIXEL:800:480:0:0:0\n\
                 tb.vhdl:70:5:@3ns:(report note): done\n";

    let output = run_with_stdin(dir.path(), ".", input);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Clear frame...\nRead pixels...\nanalyze tb.vhdl\nWriting image 1\n\
         tb.vhdl:70:5:@3ns:(report note): done\n"
    );
    let png = image::open(dir.path().join("oskimage-0001.png"))
        .unwrap()
        .into_rgba8();
    assert_eq!(png.get_pixel(0, 0).0, [0xff, 0, 0, 0xff]);
}

#[test]
fn unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = "tb.vhdl:60:5:@2ns:(report note): PIXEL:800:480:0:0:0\nafter\n";

    let output = run_with_stdin(dir.path(), "missing/dir", input);

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("after"));
}
