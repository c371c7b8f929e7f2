//! FITS header parsing (80-character keyword cards in 2880-byte blocks).

use crate::{FitsError, FitsResult, BLOCK_SIZE, CARD_SIZE};

/// Value of a header keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    String(String),
    Logical(bool),
    Integer(i64),
    Float(f64),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Integer(v) => Some(*v as f64),
            HeaderValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(v) => Some(*v),
            HeaderValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// A single header card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<HeaderValue>,
    pub comment: Option<String>,
}

/// Parsed header of one HDU.
#[derive(Debug, Clone, Default)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    /// Parse a header starting at the beginning of `data`.
    ///
    /// Returns the header and the number of bytes it occupies, which is always
    /// a multiple of the block size.
    pub fn parse(data: &[u8]) -> FitsResult<(Self, usize)> {
        let mut cards: Vec<Card> = Vec::new();
        let mut offset = 0;

        loop {
            if offset + CARD_SIZE > data.len() {
                return Err(FitsError::Truncated {
                    needed: offset + CARD_SIZE,
                    available: data.len(),
                });
            }
            let raw = &data[offset..offset + CARD_SIZE];
            offset += CARD_SIZE;

            if !raw.iter().all(|b| (0x20..=0x7E).contains(b)) {
                return Err(FitsError::InvalidHeader(format!(
                    "non-ASCII bytes in card at offset {}",
                    offset - CARD_SIZE
                )));
            }
            // Checked above: every byte is printable ASCII.
            let card = std::str::from_utf8(raw)
                .map_err(|e| FitsError::InvalidHeader(e.to_string()))?;
            let keyword = card[..8].trim_end();

            if keyword == "END" {
                break;
            }

            if keyword == "CONTINUE" {
                if let Some(Card {
                    value: Some(HeaderValue::String(prev)),
                    ..
                }) = cards.last_mut()
                {
                    if prev.ends_with('&') {
                        let (value, _) = parse_value(&card[8..])?;
                        if let Some(HeaderValue::String(more)) = value {
                            prev.pop();
                            prev.push_str(&more);
                        }
                        continue;
                    }
                }
            }

            cards.push(parse_card(keyword, card)?);
        }

        let padded = offset.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        Ok((Self { cards }, padded))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Value of a keyword; the first occurrence wins.
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        let keyword = keyword.to_uppercase();
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value.as_ref())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(HeaderValue::as_f64)
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_i64)
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(HeaderValue::as_str)
    }

    pub fn get_bool(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(HeaderValue::as_bool)
    }

    /// Integer keyword that must be present.
    pub fn require_i64(&self, keyword: &str) -> FitsResult<i64> {
        self.get_i64(keyword)
            .ok_or_else(|| FitsError::MissingKeyword(keyword.to_string()))
    }
}

fn parse_card(keyword: &str, card: &str) -> FitsResult<Card> {
    let has_value = &card[8..10] == "= ";
    if !has_value {
        // COMMENT, HISTORY, blank keyword or commentary text
        let text = card[8..].trim();
        return Ok(Card {
            keyword: keyword.to_string(),
            value: None,
            comment: (!text.is_empty()).then(|| text.to_string()),
        });
    }

    let (value, comment) = parse_value(&card[10..])?;
    Ok(Card {
        keyword: keyword.to_string(),
        value,
        comment,
    })
}

/// Parse the value field of a card, returning the value and trailing comment.
fn parse_value(field: &str) -> FitsResult<(Option<HeaderValue>, Option<String>)> {
    let trimmed = field.trim_start();

    if let Some(rest) = trimmed.strip_prefix('\'') {
        // Quoted string; '' is an escaped quote.
        let mut value = String::new();
        let mut chars = rest.char_indices().peekable();
        let mut end = None;
        while let Some((idx, ch)) = chars.next() {
            if ch == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    value.push('\'');
                    chars.next();
                    continue;
                }
                end = Some(idx + 1);
                break;
            }
            value.push(ch);
        }
        let end = end.ok_or_else(|| {
            FitsError::InvalidHeader(format!("unterminated string value: {}", field.trim()))
        })?;
        let comment = rest[end..]
            .split_once('/')
            .map(|(_, c)| c.trim().to_string())
            .filter(|c| !c.is_empty());
        return Ok((Some(HeaderValue::String(value.trim_end().to_string())), comment));
    }

    let (token, comment) = match trimmed.split_once('/') {
        Some((token, comment)) => (token.trim(), Some(comment.trim().to_string())),
        None => (trimmed.trim(), None),
    };
    let comment = comment.filter(|c| !c.is_empty());

    let value = match token {
        "" => None,
        "T" => Some(HeaderValue::Logical(true)),
        "F" => Some(HeaderValue::Logical(false)),
        _ => {
            if let Ok(int) = token.parse::<i64>() {
                Some(HeaderValue::Integer(int))
            } else {
                let normalized = token.replace(['D', 'd'], "E");
                let float = normalized.parse::<f64>().map_err(|_| {
                    FitsError::InvalidHeader(format!("unparseable value '{}'", token))
                })?;
                Some(HeaderValue::Float(float))
            }
        }
    };

    Ok((value, comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(text: &str) -> String {
        format!("{:<80}", text)
    }

    fn header_bytes(cards: &[&str]) -> Vec<u8> {
        let mut out: String = cards.iter().map(|c| card(c)).collect();
        out.push_str(&card("END"));
        while out.len() % BLOCK_SIZE != 0 {
            out.push(' ');
        }
        out.into_bytes()
    }

    #[test]
    fn test_parse_value_types() {
        let bytes = header_bytes(&[
            "SIMPLE  =                    T / conforms to FITS",
            "BITPIX  =                  -32",
            "CDELT1  =             0.600698 / arcsec per pixel",
            "EXPTIME =          1.99990D+00",
            "TELESCOP= 'SDO/AIA '           / observatory",
            "OBSERVER= 'O''Brien'",
            "HISTORY calibrated with level 1.5",
        ]);
        let (header, len) = Header::parse(&bytes).unwrap();

        assert_eq!(len, BLOCK_SIZE);
        assert_eq!(header.get_bool("SIMPLE"), Some(true));
        assert_eq!(header.get_i64("BITPIX"), Some(-32));
        assert_eq!(header.get_f64("cdelt1"), Some(0.600698));
        assert!((header.get_f64("EXPTIME").unwrap() - 1.9999).abs() < 1e-9);
        assert_eq!(header.get_str("TELESCOP"), Some("SDO/AIA"));
        assert_eq!(header.get_str("OBSERVER"), Some("O'Brien"));
        assert!(header.get("HISTORY").is_none());
        assert_eq!(header.cards().len(), 7);
    }

    #[test]
    fn test_parse_continue_string() {
        let bytes = header_bytes(&["LONGSTR = 'first half &'", "CONTINUE  'second half'"]);
        let (header, _) = Header::parse(&bytes).unwrap();
        assert_eq!(header.get_str("LONGSTR"), Some("first half second half"));
    }

    #[test]
    fn test_missing_end_is_truncated() {
        let bytes = card("SIMPLE  =                    T").into_bytes();
        assert!(matches!(
            Header::parse(&bytes),
            Err(FitsError::Truncated { .. })
        ));
    }

    #[test]
    fn test_require_missing_keyword() {
        let (header, _) = Header::parse(&header_bytes(&["SIMPLE  =                    T"])).unwrap();
        assert!(matches!(
            header.require_i64("NAXIS"),
            Err(FitsError::MissingKeyword(k)) if k == "NAXIS"
        ));
    }
}
