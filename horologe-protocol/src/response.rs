//! Classification of lines received from the radio module.

use chrono::NaiveDate;
use horologe_core::traits::{LinkEvent, NetAddress};

/// SNTP answers dated before this year mean "not synchronised yet"
pub const MIN_VALID_YEAR: i32 = 2000;

/// Reason code reported by `+CWJAP:<code>` when a join fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinFailure {
    Timeout,
    WrongPassword,
    NoAccessPoint,
    ConnectFailed,
    Unknown(u8),
}

impl JoinFailure {
    fn from_code(code: u8) -> Self {
        match code {
            1 => JoinFailure::Timeout,
            2 => JoinFailure::WrongPassword,
            3 => JoinFailure::NoAccessPoint,
            4 => JoinFailure::ConnectFailed,
            other => JoinFailure::Unknown(other),
        }
    }
}

/// One line of module output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Command completed
    Ok,
    /// Command rejected
    Error,
    /// Command ran and failed
    Fail,
    /// Module still processing the previous command
    Busy,
    /// Associated with the access point, no address yet
    WifiConnected,
    /// Address assigned by DHCP
    WifiGotIp,
    /// Association dropped
    WifiDisconnect,
    /// Station address from `AT+CIPSTA?`
    Address(NetAddress),
    /// Join failure reason
    JoinFailed(JoinFailure),
    /// SNTP time as epoch seconds, `None` if the module has no time yet
    SntpTime(Option<i64>),
    /// Anything not listed above
    Other,
}

impl Response {
    /// Classify a line, terminator already stripped
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "OK" => return Response::Ok,
            "ERROR" => return Response::Error,
            "FAIL" => return Response::Fail,
            "WIFI CONNECTED" => return Response::WifiConnected,
            "WIFI GOT IP" => return Response::WifiGotIp,
            "WIFI DISCONNECT" => return Response::WifiDisconnect,
            _ => {}
        }
        if line.starts_with("busy ") {
            return Response::Busy;
        }
        if let Some(rest) = line.strip_prefix("+CIPSTA:ip:") {
            return parse_address(rest).map_or(Response::Other, Response::Address);
        }
        if let Some(code) = line.strip_prefix("+CWJAP:") {
            // A successful query answers with `"ssid",...` instead of a code
            return code
                .parse::<u8>()
                .map_or(Response::Other, |c| Response::JoinFailed(JoinFailure::from_code(c)));
        }
        if let Some(stamp) = line.strip_prefix("+CIPSNTPTIME:") {
            return Response::SntpTime(parse_asctime(stamp));
        }
        Response::Other
    }

    /// Whether this line ends the reply to a command
    pub fn is_final(&self) -> bool {
        matches!(self, Response::Ok | Response::Error | Response::Fail)
    }

    /// Link event carried by this line
    ///
    /// `WIFI GOT IP` only counts once the address is known; `WIFI CONNECTED`
    /// alone never does.
    pub fn link_event(&self, address: Option<NetAddress>) -> Option<LinkEvent> {
        match self {
            Response::WifiGotIp => address.map(LinkEvent::Established),
            Response::WifiDisconnect => Some(LinkEvent::Lost),
            _ => None,
        }
    }
}

fn parse_address(quoted: &str) -> Option<NetAddress> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    NetAddress::parse(inner)
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse `Thu Aug 04 14:48:05 2016` into epoch seconds
///
/// The day may be space padded. Years before [`MIN_VALID_YEAR`] and
/// malformed stamps both yield `None`.
fn parse_asctime(stamp: &str) -> Option<i64> {
    let mut parts = stamp.split_ascii_whitespace();
    let _weekday = parts.next()?;
    let month = parts.next()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let hms = parts.next()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || year < MIN_VALID_YEAR {
        return None;
    }

    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let mut hms = hms.split(':').map(|p| p.parse::<u32>().ok());
    let (hour, minute, second) = (hms.next()??, hms.next()??, hms.next()??);
    if hms.next().is_some() {
        return None;
    }

    let time = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some(time.and_utc().timestamp())
}
