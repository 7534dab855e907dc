//! End-to-end scenarios (spec §8) driven through the public `run` entry
//! point, with hand-written XML standing in for a compiler's output.

use std::io::Cursor;

fn run(xml: &str, stdin: &str) -> (i32, String, String) {
  let mut input = Cursor::new(stdin.as_bytes().to_vec());
  let mut out = Vec::new();
  let mut err = Vec::new();
  let code = ippcode23::run(xml, &mut input, &mut out, &mut err);
  (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn s1_hello() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@h</arg1></instruction>
      <instruction order="2" opcode="MOVE">
        <arg1 type="var">GF@h</arg1>
        <arg2 type="string">Hello</arg2>
      </instruction>
      <instruction order="3" opcode="WRITE"><arg1 type="var">GF@h</arg1></instruction>
    </program>
  "#;
  let (code, out, _) = run(xml, "");
  assert_eq!(code, 0);
  assert_eq!(out, "Hello");
}

#[test]
fn s2_arithmetic_and_branching() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@a</arg1></instruction>
      <instruction order="2" opcode="MOVE"><arg1 type="var">GF@a</arg1><arg2 type="int">7</arg2></instruction>
      <instruction order="3" opcode="DEFVAR"><arg1 type="var">GF@b</arg1></instruction>
      <instruction order="4" opcode="MOVE"><arg1 type="var">GF@b</arg1><arg2 type="int">0o10</arg2></instruction>
      <instruction order="5" opcode="ADD">
        <arg1 type="var">GF@a</arg1><arg2 type="var">GF@a</arg2><arg3 type="var">GF@b</arg3>
      </instruction>
      <instruction order="6" opcode="WRITE"><arg1 type="var">GF@a</arg1></instruction>
    </program>
  "#;
  let (code, out, _) = run(xml, "");
  assert_eq!(code, 0);
  assert_eq!(out, "15");
}

#[test]
fn s3_division_by_zero() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
      <instruction order="2" opcode="IDIV">
        <arg1 type="var">GF@x</arg1><arg2 type="int">1</arg2><arg3 type="int">0</arg3>
      </instruction>
    </program>
  "#;
  let (code, _, err) = run(xml, "");
  assert_eq!(code, 57);
  assert!(err.contains("57"));
}

#[test]
fn s4_frame_discipline() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="CREATEFRAME"></instruction>
      <instruction order="2" opcode="DEFVAR"><arg1 type="var">TF@v</arg1></instruction>
      <instruction order="3" opcode="PUSHFRAME"></instruction>
      <instruction order="4" opcode="DEFVAR"><arg1 type="var">LF@v</arg1></instruction>
    </program>
  "#;
  let (code, _, _) = run(xml, "");
  assert_eq!(code, 52);
}

#[test]
fn s5_call_return() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="JUMP"><arg1 type="label">start</arg1></instruction>
      <instruction order="2" opcode="LABEL"><arg1 type="label">sub</arg1></instruction>
      <instruction order="3" opcode="WRITE"><arg1 type="string">hi</arg1></instruction>
      <instruction order="4" opcode="RETURN"></instruction>
      <instruction order="5" opcode="LABEL"><arg1 type="label">start</arg1></instruction>
      <instruction order="6" opcode="CALL"><arg1 type="label">sub</arg1></instruction>
      <instruction order="7" opcode="WRITE"><arg1 type="string">!</arg1></instruction>
    </program>
  "#;
  let (code, out, _) = run(xml, "");
  assert_eq!(code, 0);
  assert_eq!(out, "hi!");
}

#[test]
fn s6_type_discrimination_on_uninitialised_variable() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@v</arg1></instruction>
      <instruction order="2" opcode="DEFVAR"><arg1 type="var">GF@t</arg1></instruction>
      <instruction order="3" opcode="TYPE"><arg1 type="var">GF@t</arg1><arg2 type="var">GF@v</arg2></instruction>
      <instruction order="4" opcode="WRITE"><arg1 type="var">GF@t</arg1></instruction>
    </program>
  "#;
  let (code, out, _) = run(xml, "");
  assert_eq!(code, 0);
  assert_eq!(out, "");
}

#[test]
fn malformed_xml_exits_31() {
  let (code, _, err) = run("<program><unterminated>", "");
  assert_eq!(code, 31);
  assert!(err.contains("31"));
}

#[test]
fn duplicate_label_exits_52() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="LABEL"><arg1 type="label">x</arg1></instruction>
      <instruction order="2" opcode="LABEL"><arg1 type="label">x</arg1></instruction>
    </program>
  "#;
  let (code, _, _) = run(xml, "");
  assert_eq!(code, 52);
}

#[test]
fn read_draws_from_the_supplied_input_stream() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
      <instruction order="2" opcode="READ"><arg1 type="var">GF@x</arg1><arg2 type="type">int</arg2></instruction>
      <instruction order="3" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
    </program>
  "#;
  let (code, out, _) = run(xml, "42\n");
  assert_eq!(code, 0);
  assert_eq!(out, "42");
}

#[test]
fn exit_instruction_sets_process_exit_code() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="EXIT"><arg1 type="int">9</arg1></instruction>
    </program>
  "#;
  let (code, _, _) = run(xml, "");
  assert_eq!(code, 9);
}

#[test]
fn dprint_writes_the_raw_lexeme_not_the_resolved_value() {
  let xml = r#"
    <program language="IPPcode23">
      <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
      <instruction order="2" opcode="MOVE"><arg1 type="var">GF@x</arg1><arg2 type="int">5</arg2></instruction>
      <instruction order="3" opcode="DPRINT"><arg1 type="var">GF@x</arg1></instruction>
    </program>
  "#;
  let (code, _, err) = run(xml, "");
  assert_eq!(code, 0);
  assert_eq!(err, "GF@x\n");
}
