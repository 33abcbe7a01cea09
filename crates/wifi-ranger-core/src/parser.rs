//! Reading parser.
//!
//! Each OS tool prints its own multi-line record format. A [`Grammar`] knows
//! how to pull (SSID, signal) pairs out of one platform's output for both
//! queries, and which unit those signals are in.
//!
//! All grammars match across embedded newlines and never assume a fixed
//! number of lines between an SSID and its signal.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{Platform, Query, Reading, SignalUnit};

/// Errors that can occur while parsing command output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The tool produced output but nothing in it matched.
    #[error("No WiFi data found in {platform} {query:?} output")]
    NoDataFound { platform: Platform, query: Query },
}

/// Extraction rules for one platform.
pub trait Grammar: Send + Sync {
    /// Unit of every signal this grammar yields for `query`.
    fn unit(&self, query: Query) -> SignalUnit;

    /// Raw (ssid, signal) captures in source order.
    fn captures<'t>(&self, query: Query, text: &'t str) -> Vec<(&'t str, &'t str)>;
}

/// `netsh wlan show interfaces` / `netsh wlan show networks mode=bssid`.
pub struct WindowsGrammar;

/// `iwconfig` / `nmcli -f SSID,SIGNAL dev wifi`.
pub struct LinuxGrammar;

/// `airport -I` / `airport -s`.
pub struct MacGrammar;

/// The grammar for a platform.
pub fn grammar_for(platform: Platform) -> &'static dyn Grammar {
    match platform {
        Platform::Windows => &WindowsGrammar,
        Platform::Linux => &LinuxGrammar,
        Platform::MacOS => &MacGrammar,
    }
}

/// Parse raw command output into readings.
///
/// Captures whose signal does not convert to a finite number are dropped
/// individually. Fails with [`ParseError::NoDataFound`] when nothing is left.
pub fn parse(platform: Platform, raw_text: &str, query: Query) -> Result<Vec<Reading>, ParseError> {
    let grammar = grammar_for(platform);
    let unit = grammar.unit(query);

    // netsh pads with 0xFF, which shows up as U+00FF or, after lossy
    // decoding, as U+FFFD
    let cleaned;
    let text = if platform == Platform::Windows && raw_text.contains(CONSOLE_ARTIFACTS) {
        cleaned = raw_text.replace(CONSOLE_ARTIFACTS, "");
        cleaned.as_str()
    } else {
        raw_text
    };

    let readings: Vec<Reading> = grammar
        .captures(query, text)
        .into_iter()
        .filter_map(|(ssid, signal)| {
            let value: f64 = signal.trim().parse().ok()?;
            value
                .is_finite()
                .then(|| Reading::new(ssid.trim(), value, unit))
        })
        .collect();

    if readings.is_empty() {
        return Err(ParseError::NoDataFound { platform, query });
    }
    Ok(readings)
}

const CONSOLE_ARTIFACTS: &[char] = &['\u{FF}', '\u{FFFD}'];

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid grammar pattern"))
}

fn pairs<'t>(re: &Regex, text: &'t str) -> Vec<(&'t str, &'t str)> {
    re.captures_iter(text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

impl Grammar for WindowsGrammar {
    fn unit(&self, _query: Query) -> SignalUnit {
        SignalUnit::Percentage
    }

    fn captures<'t>(&self, query: Query, text: &'t str) -> Vec<(&'t str, &'t str)> {
        static CURRENT: OnceLock<Regex> = OnceLock::new();
        static SCAN: OnceLock<Regex> = OnceLock::new();

        // `\b` keeps BSSID lines from matching as SSID lines
        let re = match query {
            Query::CurrentStatus => compiled(
                &CURRENT,
                r"(?s)\bSSID[ \t]*:[ \t]*([^\r\n]*?)[ \t]*\r?\n.*?\bSignal[ \t]*:[ \t]*(\d+)%",
            ),
            Query::ScanAll => compiled(
                &SCAN,
                r"(?s)\bSSID[ \t]*\d+[ \t]*:[ \t]*([^\r\n]*?)[ \t]*\r?\n.*?\bSignal[ \t]*:[ \t]*(\d+)",
            ),
        };
        pairs(re, text)
    }
}

impl Grammar for LinuxGrammar {
    fn unit(&self, query: Query) -> SignalUnit {
        match query {
            Query::CurrentStatus => SignalUnit::DecibelMilliwatts,
            // nmcli reports SIGNAL as 0-100
            Query::ScanAll => SignalUnit::Percentage,
        }
    }

    fn captures<'t>(&self, query: Query, text: &'t str) -> Vec<(&'t str, &'t str)> {
        static CURRENT: OnceLock<Regex> = OnceLock::new();
        static SCAN: OnceLock<Regex> = OnceLock::new();

        let re = match query {
            Query::CurrentStatus => compiled(
                &CURRENT,
                r#"(?s)ESSID:"(.*?)".*?Signal level=(-?\d+) dBm"#,
            ),
            // SIGNAL is the last numeric column; SSIDs may contain numeric words
            Query::ScanAll => compiled(
                &SCAN,
                r"(?m)^[ \t]*(.*\S)[ \t]+(\d+)(?:[ \t]+[^\d\s]\S*)*[ \t]*\r?$",
            ),
        };
        pairs(re, text)
    }
}

impl Grammar for MacGrammar {
    fn unit(&self, _query: Query) -> SignalUnit {
        SignalUnit::DecibelMilliwatts
    }

    fn captures<'t>(&self, query: Query, text: &'t str) -> Vec<(&'t str, &'t str)> {
        static SSID: OnceLock<Regex> = OnceLock::new();
        static RSSI: OnceLock<Regex> = OnceLock::new();
        static SCAN: OnceLock<Regex> = OnceLock::new();
        static SCAN_NO_BSSID: OnceLock<Regex> = OnceLock::new();

        match query {
            Query::CurrentStatus => {
                // airport -I prints agrCtlRSSI before SSID; pair them by position
                let ssids = compiled(&SSID, r"(?m)^[ \t]*SSID:[ \t]*(.*)$")
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
                let rssis = compiled(&RSSI, r"agrCtlRSSI:[ \t]*(-?\d+)")
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
                ssids.zip(rssis).collect()
            }
            Query::ScanAll => {
                // RSSI follows the BSSID; rows without one fall back to the
                // value just before the CHANNEL and HT columns
                let with_bssid = compiled(
                    &SCAN,
                    r"^[ \t]*(.*?\S)[ \t]+[0-9A-Fa-f]{1,2}(?::[0-9A-Fa-f]{1,2}){5}[ \t]+(-?\d+)\b",
                );
                let without_bssid = compiled(
                    &SCAN_NO_BSSID,
                    r"^[ \t]*(.*\S)[ \t]+(-?\d+)[ \t]+\d+(?:,[+-]1)?[ \t]+[YN]\b",
                );
                text.lines()
                    .filter_map(|line| {
                        let caps = with_bssid
                            .captures(line)
                            .or_else(|| without_bssid.captures(line))?;
                        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
                    })
                    .collect()
            }
        }
    }
}
