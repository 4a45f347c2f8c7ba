// # Record Translation
//
// Inbound: a group of wire record sets sharing (name, type) becomes one
// neutral record. Outbound: one neutral record becomes one fragment per
// value, because the change API is driven one addition or deletion at a
// time.
//
// The two directions are not a perfect round trip. Inbound folds every
// rdata of every record set in a group into one `values` list; outbound
// never re-groups.
//
// | Type                      | Inbound                        | Outbound                   |
// |---------------------------|--------------------------------|----------------------------|
// | A, AAAA, NS, SPF          | one value per rdata            | one fragment per value     |
// | SRV, NAPTR                | rdata copied verbatim          | one fragment per value     |
// | TXT                       | `;` escaped to `\;`            | `\;` unescaped to `;`      |
// | CNAME, PTR                | first rdata is the value       | exactly one fragment       |
// | MX                        | `priority` + rdata             | priority + exchange        |
// | CAA                       | `flags tag "value"` parsed     | `flags tag "value"`        |

use zonesync_core::{CaaValue, Error, MxValue, Record, RecordData, RecordType, Result};

use crate::wire::ResourceRecordSet;

/// One minimal write unit: a single rdata, plus MX priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub content: String,
    pub priority: Option<u16>,
}

impl Fragment {
    fn content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            priority: None,
        }
    }

    /// Wire entry for this fragment under the record's name, type and ttl
    pub fn into_rrset(self, fqdn: &str, record_type: RecordType, ttl: u32) -> ResourceRecordSet {
        ResourceRecordSet {
            name: fqdn.to_string(),
            record_type: record_type.as_str().to_string(),
            ttl,
            rrdatas: vec![self.content],
            priority: self.priority,
        }
    }
}

/// Escape `;` the way the neutral model expects TXT values
pub fn escape_txt(value: &str) -> String {
    value.replace(';', "\\;")
}

/// Inverse of [`escape_txt`]
pub fn unescape_txt(value: &str) -> String {
    value.replace("\\;", ";")
}

/// Build one neutral record from every wire entry sharing (name, type)
///
/// `name` is already relative to the zone. The TTL of the first entry wins.
pub fn record_from_rrsets(
    name: &str,
    record_type: RecordType,
    group: &[ResourceRecordSet],
) -> Result<Record> {
    let first = group.first().ok_or_else(|| {
        Error::malformed(format!("No record sets for {} {:?}", record_type, name))
    })?;

    let rdatas = || group.iter().flat_map(|rrset| rrset.rrdatas.iter());
    let strings = || rdatas().cloned().collect::<Vec<_>>();
    let only = || {
        rdatas().next().cloned().ok_or_else(|| {
            Error::malformed(format!("{} {:?} has no rdata", record_type, name))
        })
    };

    let data = match record_type {
        RecordType::A => RecordData::A { values: strings() },
        RecordType::Aaaa => RecordData::Aaaa { values: strings() },
        RecordType::Ns => RecordData::Ns { values: strings() },
        RecordType::Spf => RecordData::Spf { values: strings() },
        RecordType::Srv => RecordData::Srv { values: strings() },
        RecordType::Naptr => RecordData::Naptr { values: strings() },
        RecordType::Txt => RecordData::Txt {
            values: rdatas().map(|v| escape_txt(v)).collect(),
        },
        RecordType::Cname => RecordData::Cname { value: only()? },
        RecordType::Ptr => RecordData::Ptr { value: only()? },
        RecordType::Mx => {
            let mut values = Vec::new();
            for rrset in group {
                for rdata in &rrset.rrdatas {
                    values.push(mx_value(rrset.priority, rdata)?);
                }
            }
            RecordData::Mx { values }
        }
        RecordType::Caa => RecordData::Caa {
            values: rdatas().map(|v| caa_value(v)).collect::<Result<_>>()?,
        },
    };

    Ok(Record::new(name, first.ttl, data))
}

fn mx_value(priority: Option<u16>, rdata: &str) -> Result<MxValue> {
    if let Some(preference) = priority {
        return Ok(MxValue::new(preference, rdata));
    }

    // Without a priority field the rdata carries "<preference> <exchange>"
    let (preference, exchange) = rdata
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| Error::malformed(format!("MX rdata without priority: {:?}", rdata)))?;
    let preference = preference
        .parse()
        .map_err(|_| Error::malformed(format!("Invalid MX preference: {:?}", rdata)))?;

    Ok(MxValue::new(preference, exchange.trim()))
}

fn caa_value(rdata: &str) -> Result<CaaValue> {
    let invalid = || Error::malformed(format!("Invalid CAA rdata: {:?}", rdata));

    let (flags, rest) = rdata.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let (tag, value) = rest.trim_start().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let flags = flags.parse().map_err(|_| invalid())?;

    let value = value.trim();
    let value = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(quoted) => unquote_caa(quoted),
        None => value.to_string(),
    };

    Ok(CaaValue::new(flags, tag, value))
}

/// Quote a CAA value as a character-string, escaping `"` and `\`
fn quote_caa(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Inverse of [`quote_caa`], given the text between the quotes
fn unquote_caa(quoted: &str) -> String {
    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.extend(chars.next()),
            c => value.push(c),
        }
    }
    value
}

/// Lazily produce the fragments needed to write `record`
pub fn fragments(record: &Record) -> Box<dyn Iterator<Item = Fragment> + Send + '_> {
    match &record.data {
        RecordData::A { values }
        | RecordData::Aaaa { values }
        | RecordData::Ns { values }
        | RecordData::Spf { values }
        | RecordData::Srv { values }
        | RecordData::Naptr { values } => {
            Box::new(values.iter().map(|v| Fragment::content(v.as_str())))
        }
        RecordData::Txt { values } => {
            Box::new(values.iter().map(|v| Fragment::content(unescape_txt(v))))
        }
        RecordData::Cname { value } | RecordData::Ptr { value } => {
            Box::new(std::iter::once(Fragment::content(value.as_str())))
        }
        RecordData::Mx { values } => Box::new(values.iter().map(|v| Fragment {
            content: v.exchange.clone(),
            priority: Some(v.preference),
        })),
        RecordData::Caa { values } => Box::new(values.iter().map(|v| {
            Fragment::content(format!("{} {} {}", v.flags, v.tag, quote_caa(&v.value)))
        })),
    }
}
