use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

const POU: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TcPlcObject Version="1.1.0.1">
  <POU Name="PRG_Main" Id="{00000000-0000-0000-0000-000000000001}" SpecialFunc="None">
    <Declaration><![CDATA[PROGRAM PRG_Main
VAR
    nCount : INT;
END_VAR
]]></Declaration>
    <Implementation>
      <ST><![CDATA[nCount := nCount + 1;]]></ST>
    </Implementation>
  </POU>
</TcPlcObject>
"#;

const GVL: &str = "VAR_GLOBAL\n    bReady : BOOL;\nEND_VAR\n";

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "tc-split-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn tc_split(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tc-split"))
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("run tc-split")
}

fn tc_split_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tc-split"))
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tc-split");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait tc-split")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success.\nstdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

#[test]
fn split_prints_requested_part() {
    let dir = unique_temp_dir("split-part");
    std::fs::write(dir.join("PRG_Main.TcPOU"), POU).expect("write pou");

    let output = tc_split(&dir, &["split", "PRG_Main.TcPOU", "--part", "code"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "nCount := nCount + 1;\n");

    let output = tc_split(&dir, &["split", "PRG_Main.TcPOU"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.starts_with("# PRG_Main.TcPOU (pou)\n--- declarations\nPROGRAM PRG_Main\n"));
    assert!(text.ends_with("--- code\nnCount := nCount + 1;\n"));
}

#[test]
fn split_json_uses_camel_case() {
    let dir = unique_temp_dir("split-json");
    std::fs::write(dir.join("GVL_Main.TcGVL"), GVL).expect("write gvl");

    let output = tc_split(&dir, &["split", "GVL_Main.TcGVL", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["declarations"], "bReady : BOOL;");
    assert_eq!(value["prefix"], "VAR_GLOBAL");
    assert_eq!(value["endMarker"], "END_VAR");
    assert_eq!(value["fileKind"], "globalVarList");
    assert!(value.get("fallback").is_none());
}

#[test]
fn apply_code_replaces_document() {
    let dir = unique_temp_dir("apply-code");
    let file = dir.join("PRG_Main.TcPOU");
    std::fs::write(&file, POU).expect("write pou");
    std::fs::write(dir.join("body.st"), "nCount := 0;\n").expect("write body");

    let output = tc_split(&dir, &["apply", "PRG_Main.TcPOU", "--code", "body.st"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Updated PRG_Main.TcPOU"));

    let saved = std::fs::read_to_string(&file).expect("read saved");
    assert!(saved.contains("<ST><![CDATA[\nnCount := 0;\n]]></ST>"));
    assert!(saved.contains("    nCount : INT;\nEND_VAR\n]]></Declaration>"));
    assert!(saved.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<TcPlcObject"));
    assert!(saved.ends_with("  </POU>\n</TcPlcObject>\n"));

    let output = tc_split(&dir, &["split", "PRG_Main.TcPOU", "--part", "code"]);
    assert_eq!(stdout(&output), "nCount := 0;\n");
}

#[test]
fn apply_from_stdin_dry_run_leaves_file() {
    let dir = unique_temp_dir("apply-stdin");
    let file = dir.join("GVL_Main.TcGVL");
    std::fs::write(&file, GVL).expect("write gvl");

    let output = tc_split_with_stdin(
        &dir,
        &["apply", "GVL_Main.TcGVL", "--declarations", "-", "--dry-run"],
        "bReady : BOOL;\nnSpeed : INT;\n",
    );
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "VAR_GLOBAL\nbReady : BOOL;\nnSpeed : INT;\nEND_VAR\n"
    );
    assert_eq!(std::fs::read_to_string(&file).expect("read"), GVL);
}

#[test]
fn apply_to_output_path() {
    let dir = unique_temp_dir("apply-output");
    std::fs::write(dir.join("GVL_Main.TcGVL"), GVL).expect("write gvl");
    std::fs::write(dir.join("decl.st"), "bDone : BOOL;").expect("write decl");

    let output = tc_split(
        &dir,
        &[
            "apply",
            "GVL_Main.TcGVL",
            "--declarations",
            "decl.st",
            "--line-ending",
            "crlf",
            "--output",
            "out.TcGVL",
        ],
    );
    assert_success(&output);
    assert_eq!(
        std::fs::read_to_string(dir.join("out.TcGVL")).expect("read output"),
        "VAR_GLOBAL\r\nbDone : BOOL;\r\nEND_VAR\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.join("GVL_Main.TcGVL")).expect("read input"),
        GVL
    );
}

#[test]
fn apply_refuses_degraded_document_without_force() {
    let dir = unique_temp_dir("apply-degraded");
    let broken = "<POU Name=\"P\">\n  <Implementation/>\n</POU>\n";
    std::fs::write(dir.join("P.TcPOU"), broken).expect("write pou");
    std::fs::write(dir.join("body.st"), ";").expect("write body");

    let output = tc_split(&dir, &["apply", "P.TcPOU", "--code", "body.st"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error: P.TcPOU does not round-trip cleanly as pou"), "{err}");
    assert!(err.contains("--force"), "{err}");
    assert_eq!(
        std::fs::read_to_string(dir.join("P.TcPOU")).expect("read"),
        broken
    );

    let output = tc_split(&dir, &["apply", "P.TcPOU", "--code", "body.st", "--force"]);
    assert_success(&output);
}

#[test]
fn apply_without_parts_is_an_error() {
    let dir = unique_temp_dir("apply-empty");
    std::fs::write(dir.join("GVL_Main.TcGVL"), GVL).expect("write gvl");

    let output = tc_split(&dir, &["apply", "GVL_Main.TcGVL"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nothing to apply"));
}

#[test]
fn check_reports_fidelity_and_exit_status() {
    let dir = unique_temp_dir("check");
    std::fs::write(dir.join("PRG_Main.TcPOU"), POU).expect("write pou");
    std::fs::write(dir.join("GVL_Main.TcGVL"), "VAR_GLOBAL\nx : INT;\nEND_VAR").expect("write gvl");
    std::fs::write(dir.join("Broken.TcPOU"), "<POU/>").expect("write broken");

    let output = tc_split(&dir, &["check", "PRG_Main.TcPOU", "GVL_Main.TcGVL"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("PRG_Main.TcPOU  pou  seam-equivalent"), "{text}");
    assert!(text.contains("GVL_Main.TcGVL  gvl  exact"), "{text}");

    let output = tc_split(&dir, &["check", "PRG_Main.TcPOU", "Broken.TcPOU", "--json"]);
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value[0]["fidelity"], "seamEquivalent");
    assert_eq!(value[1]["fidelity"], "degraded");
    assert_eq!(value[1]["fallback"], "blockNotFound");
}

#[test]
fn check_diff_shows_rebuilt_seams() {
    let dir = unique_temp_dir("check-diff");
    std::fs::write(dir.join("GVL_Main.TcGVL"), GVL).expect("write gvl");

    let output = tc_split(&dir, &["check", "GVL_Main.TcGVL", "--diff"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("--- GVL_Main.TcGVL (original)"), "{text}");
    assert!(text.contains("-    bReady : BOOL;\n+bReady : BOOL;\n"), "{text}");
}

#[test]
fn kinds_include_configured_aliases() {
    let dir = unique_temp_dir("kinds");
    std::fs::write(
        dir.join("tc-split.toml"),
        "[extensions]\npou = [\"pou\"]\n",
    )
    .expect("write config");
    std::fs::write(dir.join("Main.pou"), POU).expect("write pou");

    let output = tc_split(&dir, &["kinds", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["pou"], "pouXml");
    assert_eq!(value["tcdut"], "typeDef");

    let output = tc_split(&dir, &["split", "Main.pou", "--part", "declarations"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("PROGRAM PRG_Main"));
}

#[test]
fn explicit_invalid_config_fails() {
    let dir = unique_temp_dir("config-explicit");
    std::fs::write(dir.join("bad.toml"), "[reassemble]\nline_ending = 3\n").expect("write config");

    let output = tc_split(&dir, &["--config", "bad.toml", "kinds"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid config bad.toml"));
}

#[test]
fn unknown_subcommand_suggests_alternative() {
    let dir = unique_temp_dir("suggest");
    let output = tc_split(&dir, &["chek", "x"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Did you mean: check?"));
}
