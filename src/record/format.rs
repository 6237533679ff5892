//! Percent-style message interpolation.
//!
//! Supports `%s %r %d %i %u %f %F %e %E %g %G %x %X %o %c %%` with
//! flags (`-+ 0#`), width and precision. A single JSON object argument
//! enables mapping keys: `"%(user)s logged in"`.

use serde_json::Value;

use crate::error::{LoggingError, Result};

/// Largest width or precision a placeholder may ask for.
pub const MAX_FIELD_WIDTH: usize = 4096;

#[derive(Debug, Default, Clone)]
struct Spec {
    key: Option<String>,
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alt: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Interpolate `args` into `template`.
///
/// With no arguments the template is returned unchanged, `%` signs included.
pub fn percent_format(template: &str, args: &[Value]) -> Result<String> {
    if args.is_empty() {
        return Ok(template.to_string());
    }

    let mapping = match args {
        [Value::Object(map)] if template.contains("%(") => Some(map),
        _ => None,
    };

    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = parse_spec(&mut chars)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }

        let value = match (&spec.key, mapping) {
            (Some(key), Some(map)) => map
                .get(key)
                .ok_or_else(|| LoggingError::format(format!("missing mapping key {:?}", key)))?,
            (Some(_), None) => return Err(LoggingError::format("format requires a mapping")),
            (None, Some(_)) => &args[0],
            (None, None) => {
                let value = args.get(next_arg).ok_or_else(|| {
                    LoggingError::format("not enough arguments for format string")
                })?;
                next_arg += 1;
                value
            }
        };

        let body = convert(&spec, value)?;
        out.push_str(&pad(&spec, body));
    }

    if mapping.is_none() && next_arg < args.len() {
        return Err(LoggingError::format(
            "not all arguments converted during string formatting",
        ));
    }

    Ok(out)
}

fn parse_spec(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Spec> {
    let mut spec = Spec::default();

    if chars.peek() == Some(&'(') {
        chars.next();
        let mut key = String::new();
        loop {
            match chars.next() {
                Some(')') => break,
                Some(c) => key.push(c),
                None => return Err(LoggingError::format("incomplete format key")),
            }
        }
        spec.key = Some(key);
    }

    while let Some(&c) = chars.peek() {
        match c {
            '-' => spec.left = true,
            '0' => spec.zero = true,
            '+' => spec.plus = true,
            ' ' => spec.space = true,
            '#' => spec.alt = true,
            _ => break,
        }
        chars.next();
    }

    spec.width = take_number(chars, "width")?;

    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(take_number(chars, "prec")?.unwrap_or(0));
    }

    // length modifiers are accepted and ignored
    while matches!(chars.peek(), Some('h' | 'l' | 'L')) {
        chars.next();
    }

    spec.conversion = chars
        .next()
        .ok_or_else(|| LoggingError::format("incomplete format"))?;
    Ok(spec)
}

fn take_number(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    what: &str,
) -> Result<Option<usize>> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    if digits.is_empty() {
        return Ok(None);
    }
    match digits.parse::<usize>() {
        Ok(n) if n <= MAX_FIELD_WIDTH => Ok(Some(n)),
        _ => Err(LoggingError::format(format!("{} too big", what))),
    }
}

fn convert(spec: &Spec, value: &Value) -> Result<String> {
    let text = match spec.conversion {
        's' => {
            let s = display(value);
            truncate(s, spec.precision)
        }
        'r' | 'a' => truncate(repr(value), spec.precision),
        'd' | 'i' | 'u' => {
            let n = as_integer(value, spec.conversion)?;
            signed(spec, n < 0, n.unsigned_abs().to_string())
        }
        'x' | 'X' | 'o' => {
            let n = as_integer(value, spec.conversion)?;
            let magnitude = n.unsigned_abs();
            let mut digits = match spec.conversion {
                'x' => format!("{:x}", magnitude),
                'X' => format!("{:X}", magnitude),
                _ => format!("{:o}", magnitude),
            };
            if spec.alt {
                let prefix = match spec.conversion {
                    'x' => "0x",
                    'X' => "0X",
                    _ => "0o",
                };
                digits = format!("{}{}", prefix, digits);
            }
            signed(spec, n < 0, digits)
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let f = as_float(value, spec.conversion)?;
            let precision = spec.precision.unwrap_or(6);
            let body = match spec.conversion {
                'f' | 'F' => float_fixed(f.abs(), precision, spec.conversion == 'F'),
                'e' | 'E' => float_exp(f.abs(), precision, spec.conversion == 'E'),
                _ => float_general(f.abs(), precision, spec.conversion == 'G', spec.alt),
            };
            signed(spec, f.is_sign_negative() && f != 0.0, body)
        }
        'c' => match value {
            Value::String(s) if s.chars().count() == 1 => s.clone(),
            Value::Number(_) => {
                let code = as_integer(value, 'c')?;
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .ok_or_else(|| LoggingError::format("%c arg not in range"))?
            }
            _ => return Err(LoggingError::format("%c requires int or char")),
        },
        other => {
            return Err(LoggingError::format(format!(
                "unsupported format character {:?}",
                other
            )))
        }
    };
    Ok(text)
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        other => display(other),
    }
}

fn truncate(s: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s,
    }
}

fn as_integer(value: &Value, conversion: char) -> Result<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i128::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(i128::from(u));
            }
            // fractional values truncate; anything beyond i64 cannot be exact
            let in_range = |f: f64| f >= i64::MIN as f64 && f < i64::MAX as f64;
            match n.as_f64().map(f64::trunc) {
                Some(f) if f.is_finite() && in_range(f) => Ok(f as i128),
                _ => Err(LoggingError::format(format!(
                    "%{} value out of range",
                    conversion
                ))),
            }
        }
        Value::Bool(b) => Ok(i128::from(*b)),
        _ => Err(LoggingError::format(format!(
            "%{} format: a real number is required, not {}",
            conversion,
            type_name(value)
        ))),
    }
}

fn as_float(value: &Value, conversion: char) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| LoggingError::format(format!("%{} value out of range", conversion))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(LoggingError::format(format!(
            "%{} format: a real number is required, not {}",
            conversion,
            type_name(value)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn float_fixed(f: f64, precision: usize, upper: bool) -> String {
    if !f.is_finite() {
        return non_finite(f, upper);
    }
    format!("{:.*}", precision, f)
}

fn float_exp(f: f64, precision: usize, upper: bool) -> String {
    if !f.is_finite() {
        return non_finite(f, upper);
    }
    let (mantissa, exponent) = split_exp(f, precision);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, e, sign, exponent.unsigned_abs())
}

fn float_general(f: f64, precision: usize, upper: bool, alt: bool) -> String {
    if !f.is_finite() {
        return non_finite(f, upper);
    }
    let p = precision.max(1);
    let (_, exponent) = split_exp(f, p - 1);

    let body = if exponent >= -4 && exponent < p as i32 {
        let decimals = (p as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, f)
    } else {
        float_exp(f, p - 1, upper)
    };

    if alt {
        return body;
    }
    strip_trailing_zeros(body)
}

fn split_exp(f: f64, precision: usize) -> (String, i32) {
    let formatted = format!("{:.*e}", precision, f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

fn strip_trailing_zeros(body: String) -> String {
    let (number, exponent) = match body.find(['e', 'E']) {
        Some(idx) => body.split_at(idx),
        None => (body.as_str(), ""),
    };
    if !number.contains('.') {
        return body;
    }
    let trimmed = number.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, exponent)
}

fn non_finite(f: f64, upper: bool) -> String {
    let s = if f.is_nan() { "nan" } else { "inf" };
    if upper {
        s.to_uppercase()
    } else {
        s.to_string()
    }
}

fn signed(spec: &Spec, negative: bool, magnitude: String) -> String {
    let sign = if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };

    match spec.width {
        Some(width) if spec.zero && !spec.left => {
            let used = sign.len() + magnitude.chars().count();
            let zeros = width.saturating_sub(used);
            format!("{}{}{}", sign, "0".repeat(zeros), magnitude)
        }
        _ => format!("{}{}", sign, magnitude),
    }
}

fn pad(spec: &Spec, body: String) -> String {
    let width = match spec.width {
        Some(w) => w,
        None => return body,
    };
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = " ".repeat(width - len);
    if spec.left {
        format!("{}{}", body, fill)
    } else {
        format!("{}{}", fill, body)
    }
}
