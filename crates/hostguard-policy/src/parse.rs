use crate::error::{PolicyError, RuleIssue};
use hostguard_domain::matcher::ComparisonMode;
use hostguard_domain::model::{ModelError, Policy, Rule, Test};
use hostguard_types::{Confidence, ids};
use serde_json::{Map, Value};

/// Validate a parsed policy document and build the domain model.
///
/// All entries are checked before returning so the caller sees every problem at once.
pub fn build_policy(doc: &Value) -> Result<Policy, PolicyError> {
    let entries = rule_entries(doc).ok_or(PolicyError::Shape)?;

    let mut rules = Vec::new();
    let mut issues = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        match parse_entry(i + 1, entry) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err(mut found) => issues.append(&mut found),
        }
    }

    if issues.is_empty() {
        Ok(Policy { rules })
    } else {
        Err(PolicyError::Invalid { issues })
    }
}

fn rule_entries(doc: &Value) -> Option<&Vec<Value>> {
    match doc {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => map.get(ids::KEY_RULES)?.as_array(),
        _ => None,
    }
}

/// `Ok(None)` for comment entries.
fn parse_entry(entry: usize, value: &Value) -> Result<Option<Rule>, Vec<RuleIssue>> {
    let Some(obj) = value.as_object() else {
        return Err(vec![RuleIssue::new(entry, "", "expected a table")]);
    };
    if obj.contains_key(ids::KEY_COMMENT) {
        return Ok(None);
    }

    let mut issues = Vec::new();

    let description = required_str(obj, ids::KEY_DESCRIPTION, entry, &mut issues);
    let confidence = required_str(obj, ids::KEY_CONFIDENCE, entry, &mut issues).and_then(|v| {
        let parsed = Confidence::parse(v);
        if parsed.is_none() {
            issues.push(RuleIssue::new(
                entry,
                ids::KEY_CONFIDENCE,
                format!("unknown confidence `{v}` (expected required, recommended or experimental)"),
            ));
        }
        parsed
    });
    let tests = parse_tests(obj, entry, &mut issues);
    let fix = parse_fix(obj, entry, &mut issues);

    let (Some(description), Some(confidence), Some(tests), Some(fix)) =
        (description, confidence, tests, fix)
    else {
        return Err(issues);
    };

    let mut rule = Rule::new(description, confidence, tests)
        .map_err(|e| vec![model_issue(entry, ids::KEY_TESTS, e)])?;
    rule.fix = fix.command;
    rule.privileged_fix = fix.sudo_command;
    rule.manual_instructions = fix.manual;
    Ok(Some(rule))
}

fn parse_tests(
    obj: &Map<String, Value>,
    entry: usize,
    issues: &mut Vec<RuleIssue>,
) -> Option<Vec<Test>> {
    let Some(raw) = obj.get(ids::KEY_TESTS) else {
        issues.push(RuleIssue::new(entry, ids::KEY_TESTS, "missing"));
        return None;
    };
    let Some(list) = raw.as_array() else {
        issues.push(RuleIssue::new(entry, ids::KEY_TESTS, "expected a list"));
        return None;
    };
    if list.is_empty() {
        issues.push(RuleIssue::new(entry, ids::KEY_TESTS, "needs at least one test"));
        return None;
    }

    let before = issues.len();
    let tests: Vec<Test> = list
        .iter()
        .enumerate()
        .filter_map(|(i, t)| parse_test(t, entry, &format!("{}[{i}]", ids::KEY_TESTS), issues))
        .collect();

    (issues.len() == before).then_some(tests)
}

fn parse_test(value: &Value, entry: usize, path: &str, issues: &mut Vec<RuleIssue>) -> Option<Test> {
    let Some(obj) = value.as_object() else {
        issues.push(RuleIssue::new(entry, path, "expected a table"));
        return None;
    };
    let field = |key: &str| format!("{path}.{key}");

    let mode = match obj.get(ids::KEY_TYPE).and_then(Value::as_str) {
        Some(ids::TYPE_EXACT_MATCH) => Some(ComparisonMode::ExactMatch),
        Some(ids::TYPE_REGEX_MATCH) => Some(ComparisonMode::PatternMatch),
        Some(other) => {
            issues.push(RuleIssue::new(
                entry,
                field(ids::KEY_TYPE),
                format!("unknown comparison `{other}` (expected `exact match` or `regex match`)"),
            ));
            None
        }
        None => {
            issues.push(RuleIssue::new(entry, field(ids::KEY_TYPE), "missing or not a string"));
            None
        }
    };

    let command = obj.get(ids::KEY_COMMAND).and_then(Value::as_str);
    if command.is_none() {
        issues.push(RuleIssue::new(
            entry,
            field(ids::KEY_COMMAND),
            "missing or not a string",
        ));
    }

    let case_sensitive = match obj.get(ids::KEY_CASE_SENSITIVE) {
        None => {
            issues.push(RuleIssue::new(entry, field(ids::KEY_CASE_SENSITIVE), "missing"));
            None
        }
        Some(v) => {
            let flag = coerce_flag(v);
            if flag.is_none() {
                issues.push(RuleIssue::new(
                    entry,
                    field(ids::KEY_CASE_SENSITIVE),
                    format!("cannot read `{v}` as a boolean"),
                ));
            }
            flag
        }
    };

    let pass = expectation(obj, ids::KEY_COMMAND_PASS);
    let fail = expectation(obj, ids::KEY_COMMAND_FAIL);
    if pass.is_none() && fail.is_none() {
        issues.push(RuleIssue::new(
            entry,
            path,
            "needs `command_pass` or `command_fail`",
        ));
        return None;
    }

    let (Some(mode), Some(command), Some(case_sensitive)) = (mode, command, case_sensitive) else {
        return None;
    };
    match Test::new(command, mode, case_sensitive, pass.as_deref(), fail.as_deref()) {
        Ok(test) => Some(test),
        Err(e) => {
            issues.push(model_issue(entry, path, e));
            None
        }
    }
}

struct FixSpec {
    command: Option<String>,
    sudo_command: Option<String>,
    manual: Option<String>,
}

fn parse_fix(obj: &Map<String, Value>, entry: usize, issues: &mut Vec<RuleIssue>) -> Option<FixSpec> {
    let Some(fix) = obj.get(ids::KEY_FIX).and_then(Value::as_object) else {
        issues.push(RuleIssue::new(entry, ids::KEY_FIX, "missing or not a table"));
        return None;
    };

    let mut text = |key: &str| match fix.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(RuleIssue::new(
                entry,
                format!("{}.{key}", ids::KEY_FIX),
                "expected a string",
            ));
            None
        }
    };
    let spec = FixSpec {
        command: text(ids::KEY_COMMAND),
        sudo_command: text(ids::KEY_SUDO_COMMAND),
        manual: text(ids::KEY_MANUAL),
    };

    if spec.command.is_none() && spec.sudo_command.is_none() && spec.manual.is_none() {
        issues.push(RuleIssue::new(
            entry,
            ids::KEY_FIX,
            "needs at least one of `command`, `sudo_command` or `manual`",
        ));
        return None;
    }
    Some(spec)
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    entry: usize,
    issues: &mut Vec<RuleIssue>,
) -> Option<&'a str> {
    let v = obj.get(key).and_then(Value::as_str);
    if v.is_none() {
        issues.push(RuleIssue::new(entry, key, "missing or not a string"));
    }
    v
}

/// Expected outputs are compared as text; scalars are accepted in their printed form. Booleans
/// print capitalized (`True`/`False`), the way policies written for the original checker expect.
fn expectation(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce_flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn model_issue(entry: usize, field: impl Into<String>, err: ModelError) -> RuleIssue {
    RuleIssue::new(entry, field, err.to_string())
}
