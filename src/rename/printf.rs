//! Printf-style formatting of a single value
//!
//! Supports the flags `+ - # 0` and space, a width, a `.precision` and the
//! verbs `v s q t d b o x X c U e E f F g G`. Literal text around the
//! directive is copied through and `%%` is a literal percent sign. A verb
//! that does not fit the value renders as `%!verb(type=value)`. Widths and
//! precisions above [`MAX_WIDTH`] render as `%!(BADWIDTH)` and `%!(BADPREC)`
//! and are ignored.

/// Largest width or precision a directive may ask for
pub const MAX_WIDTH: usize = 1024;

/// A value to format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Directive {
    plus: bool,
    minus: bool,
    sharp: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

/// Format `arg` according to `format`
pub fn sprintf(format: &str, arg: Arg) -> String {
    let mut out = String::new();
    let mut chars = format.chars().peekable();
    let mut used = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut d = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '+' => d.plus = true,
                '-' => d.minus = true,
                '#' => d.sharp = true,
                '0' => d.zero = true,
                ' ' => d.space = true,
                _ => break,
            }
            chars.next();
        }
        d.width = take_number(&mut chars);
        if d.width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            d.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            d.precision = Some(take_number(&mut chars).unwrap_or(0));
            if d.precision.is_some_and(|p| p > MAX_WIDTH) {
                out.push_str("%!(BADPREC)");
                d.precision = None;
            }
        }
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        d.verb = verb;

        if used {
            out.push_str(&format!("%!{}(MISSING)", verb));
        } else {
            out.push_str(&format_one(&d, arg));
            used = true;
        }
    }

    if !used {
        out.push_str(&format!("%!(EXTRA {})", describe(arg)));
    }
    out
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(usize::MAX))
}

fn describe(arg: Arg) -> String {
    match arg {
        Arg::Bool(b) => format!("bool={}", b),
        Arg::Int(i) => format!("int64={}", i),
        Arg::Float(f) => format!("float64={}", shortest(f)),
        Arg::Str(s) => format!("string={}", s),
    }
}

fn bad_verb(d: &Directive, arg: Arg) -> String {
    format!("%!{}({})", d.verb, describe(arg))
}

fn format_one(d: &Directive, arg: Arg) -> String {
    match arg {
        Arg::Bool(b) => match d.verb {
            't' | 'v' => pad(d, "", &b.to_string(), false),
            _ => bad_verb(d, arg),
        },
        Arg::Str(s) => match d.verb {
            's' | 'v' => {
                let text: String = match d.precision {
                    Some(p) => s.chars().take(p).collect(),
                    None => s.to_string(),
                };
                pad(d, "", &text, false)
            }
            'q' => pad(d, "", &format!("{:?}", s), false),
            _ => bad_verb(d, arg),
        },
        Arg::Int(i) => format_int(d, i).unwrap_or_else(|| bad_verb(d, arg)),
        Arg::Float(f) => format_float(d, f).unwrap_or_else(|| bad_verb(d, arg)),
    }
}

fn sign(d: &Directive, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if d.plus {
        "+"
    } else if d.space {
        " "
    } else {
        ""
    }
}

fn format_int(d: &Directive, i: i64) -> Option<String> {
    let magnitude = i.unsigned_abs();
    let (prefix, digits) = match d.verb {
        'd' | 'v' => ("", magnitude.to_string()),
        'b' => (if d.sharp { "0b" } else { "" }, format!("{:b}", magnitude)),
        'o' => (if d.sharp { "0" } else { "" }, format!("{:o}", magnitude)),
        'x' => (if d.sharp { "0x" } else { "" }, format!("{:x}", magnitude)),
        'X' => (if d.sharp { "0X" } else { "" }, format!("{:X}", magnitude)),
        'c' => {
            let c = char::from_u32(u32::try_from(i).ok()?).unwrap_or('\u{FFFD}');
            return Some(pad(d, "", &c.to_string(), false));
        }
        'q' => {
            let c = char::from_u32(u32::try_from(i).ok()?).unwrap_or('\u{FFFD}');
            return Some(pad(d, "", &format!("{:?}", c), false));
        }
        'U' => {
            let mut text = format!("U+{:04X}", i);
            if d.sharp {
                if let Some(c) = u32::try_from(i).ok().and_then(char::from_u32) {
                    text.push_str(&format!(" '{}'", c));
                }
            }
            return Some(pad(d, "", &text, false));
        }
        _ => return None,
    };

    // Precision is a minimum digit count and disables zero padding
    let digits = match d.precision {
        Some(0) if magnitude == 0 => String::new(),
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    };
    let head = format!("{}{}", sign(d, i < 0), prefix);
    Some(pad(d, &head, &digits, d.precision.is_none()))
}

fn format_float(d: &Directive, f: f64) -> Option<String> {
    if !matches!(d.verb, 'e' | 'E' | 'f' | 'F' | 'g' | 'G' | 'v') {
        return None;
    }
    if f.is_nan() {
        return Some(pad(d, "", "NaN", false));
    }
    if f.is_infinite() {
        let text = if f < 0.0 { "-Inf" } else if d.plus { "+Inf" } else { "Inf" };
        return Some(pad(d, "", text, false));
    }

    let magnitude = f.abs();
    let body = match d.verb {
        'e' => exponent(magnitude, d.precision.unwrap_or(6)),
        'E' => exponent(magnitude, d.precision.unwrap_or(6)).to_uppercase(),
        'f' | 'F' => format!("{:.*}", d.precision.unwrap_or(6), magnitude),
        'g' => general(magnitude, d.precision, d.sharp, 6),
        'G' => general(magnitude, d.precision, d.sharp, 6).to_uppercase(),
        'v' => general(magnitude, d.precision, d.sharp, 21),
        _ => unreachable!(),
    };
    let head = sign(d, f.is_sign_negative() && f != 0.0);
    Some(pad(d, head, &body, true))
}

/// Mantissa with `precision` decimals and a signed two-digit exponent
fn exponent(f: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, f);
    fix_exponent(&raw)
}

fn fix_exponent(raw: &str) -> String {
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw.to_string(),
    }
}

fn decimal_exponent(f: f64) -> i32 {
    if f == 0.0 {
        return 0;
    }
    let raw = format!("{:e}", f);
    raw.split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

fn shortest(f: f64) -> String {
    let text = general(f.abs(), None, false, 21);
    if f.is_sign_negative() && f != 0.0 {
        format!("-{}", text)
    } else {
        text
    }
}

/// `%g`: exponent form for very small or large values, trailing zeros
/// removed. Without a precision the shortest representation is used and
/// `limit` is the exponent at which it switches to exponent form.
fn general(f: f64, precision: Option<usize>, sharp: bool, limit: i32) -> String {
    match precision {
        None => {
            let exp = decimal_exponent(f);
            if exp < -4 || exp >= limit {
                fix_exponent(&format!("{:e}", f))
            } else {
                format!("{}", f)
            }
        }
        Some(p) => {
            let p = p.max(1);
            let rounded = format!("{:.*e}", p - 1, f);
            let exp = rounded
                .split_once('e')
                .and_then(|(_, e)| e.parse::<i32>().ok())
                .unwrap_or(0);
            let text = if exp < -4 || exp >= p as i32 {
                fix_exponent(&rounded)
            } else {
                let decimals = (p as i32 - 1 - exp).max(0) as usize;
                format!("{:.*}", decimals, f)
            };
            if sharp {
                text
            } else {
                trim_zeros(&text)
            }
        }
    }
}

fn trim_zeros(text: &str) -> String {
    let (mantissa, exp) = match text.find('e') {
        Some(pos) => text.split_at(pos),
        None => (text, ""),
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!("{}{}", mantissa, exp)
}

/// Apply width: zeros go between the sign/prefix and the digits
fn pad(d: &Directive, head: &str, body: &str, numeric: bool) -> String {
    let len = head.chars().count() + body.chars().count();
    let width = d.width.unwrap_or(0);
    if len >= width {
        return format!("{}{}", head, body);
    }
    let fill = width - len;
    if d.minus {
        format!("{}{}{}", head, body, " ".repeat(fill))
    } else if d.zero && (numeric || head.is_empty()) {
        format!("{}{}{}", head, "0".repeat(fill), body)
    } else {
        format!("{}{}{}", " ".repeat(fill), head, body)
    }
}
