//! 最小的 XML-RPC 編解碼，只涵蓋 Odoo `common` / `object` 端點會用到的型別。
//!
//! 請求直接組字串（內容以 `quick_xml::escape` 跳脫），回應以 `roxmltree` 解析成
//! `serde_json::Value`，方便和試算表資料共用同一種表示法。

use crate::utils::error::{ImportError, Result};
use quick_xml::escape::escape;
use roxmltree::{Document, Node};
use serde_json::{Map, Number, Value};

pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName><params>");
    for param in params {
        xml.push_str("<param>");
        encode_value(param, &mut xml);
        xml.push_str("</param>");
    }
    xml.push_str("</params></methodCall>");
    xml
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        // Odoo 以 False 表示空值
        Value::Null => out.push_str("<boolean>0</boolean>"),
        Value::Bool(b) => {
            out.push_str(if *b {
                "<boolean>1</boolean>"
            } else {
                "<boolean>0</boolean>"
            });
        }
        Value::Number(n) => encode_number(n, out),
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Object(map) => {
            out.push_str("<struct>");
            for (name, member) in map {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

fn encode_number(n: &Number, out: &mut String) {
    if let Some(i) = n.as_i64() {
        if i32::try_from(i).is_ok() {
            out.push_str(&format!("<int>{}</int>", i));
        } else {
            out.push_str(&format!("<i8>{}</i8>", i));
        }
    } else if let Some(f) = n.as_f64() {
        out.push_str(&format!("<double>{}</double>", f));
    }
}

/// 解析 `<methodResponse>`；`<fault>` 轉成 `FaultError`
pub fn decode_response(body: &str) -> Result<Value> {
    let doc = Document::parse(body)?;
    let root = doc.root_element();
    if root.tag_name().name() != "methodResponse" {
        return Err(ImportError::protocol(format!(
            "expected <methodResponse>, found <{}>",
            root.tag_name().name()
        )));
    }

    let body = first_element(root, "methodResponse")?;
    match body.tag_name().name() {
        "params" => {
            let param = child_element(body, "param")?;
            decode_value(child_element(param, "value")?)
        }
        "fault" => Err(decode_fault(child_element(body, "value")?)),
        other => Err(ImportError::protocol(format!(
            "unexpected <{}> in methodResponse",
            other
        ))),
    }
}

fn decode_fault(value: Node) -> ImportError {
    let fault = match decode_value(value) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return ImportError::protocol(format!("fault value is not a struct: {}", other))
        }
        Err(e) => return e,
    };

    let code = match fault.get("faultCode") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let message = fault
        .get("faultString")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    ImportError::FaultError { code, message }
}

fn decode_value(node: Node) -> Result<Value> {
    // 沒有型別標籤時依規範視為字串
    let Some(typed) = elements(node).next() else {
        return Ok(Value::String(node.text().unwrap_or_default().to_string()));
    };

    let text = typed.text().unwrap_or_default();
    match typed.tag_name().name() {
        "int" | "i4" | "i8" => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| ImportError::protocol(format!("invalid integer '{}': {}", text, e))),
        "boolean" => match text.trim() {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other => Err(ImportError::protocol(format!("invalid boolean '{}'", other))),
        },
        "double" => {
            let f = text
                .trim()
                .parse::<f64>()
                .map_err(|e| ImportError::protocol(format!("invalid double '{}': {}", text, e)))?;
            Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
        }
        "string" | "dateTime.iso8601" | "base64" => Ok(Value::String(text.to_string())),
        "nil" => Ok(Value::Null),
        "array" => {
            let data = child_element(typed, "data")?;
            elements(data)
                .filter(|n| n.has_tag_name("value"))
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut map = Map::new();
            for member in elements(typed).filter(|n| n.has_tag_name("member")) {
                let name = child_element(member, "name")?
                    .text()
                    .unwrap_or_default()
                    .to_string();
                let value = decode_value(child_element(member, "value")?)?;
                map.insert(name, value);
            }
            Ok(Value::Object(map))
        }
        other => Err(ImportError::protocol(format!(
            "unsupported XML-RPC type <{}>",
            other
        ))),
    }
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn first_element<'a, 'input>(node: Node<'a, 'input>, parent: &str) -> Result<Node<'a, 'input>> {
    elements(node)
        .next()
        .ok_or_else(|| ImportError::protocol(format!("empty <{}>", parent)))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    elements(node).find(|n| n.has_tag_name(name)).ok_or_else(|| {
        ImportError::protocol(format!(
            "missing <{}> inside <{}>",
            name,
            node.tag_name().name()
        ))
    })
}
