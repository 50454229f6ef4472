//! Radio module task
//!
//! Owns the UART to the ESP-AT module. Commands are serialised: one is
//! outstanding at a time and its reply is bounded by a timeout. Lines that
//! arrive outside a reply are link notifications and are forwarded to the
//! frame task as link events.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Instant, Timer};
use embedded_io_async::{Read, Write};

use horologe_core::config::ClockConfig;
use horologe_core::traits::NetAddress;
use horologe_protocol::{Command, JoinFailure, LineParser, Response, MAX_COMMAND_LEN};

use crate::channels::{
    set_link_status, LinkStatus, CONNECT_REQUEST, LINK_EVENTS, SNTP_ANSWER, SYNC_REQUEST,
};
use crate::ntp::SntpAnswer;

/// Reply timeout for ordinary commands
const REPLY_TIMEOUT_MS: u64 = 2_000;

/// Delay between liveness probes while the module boots
const PROBE_RETRY_MS: u64 = 1_000;

/// The module reports this address while it has none
const UNASSIGNED: NetAddress = NetAddress::new(0, 0, 0, 0);

/// Errors from one command exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ModemError {
    /// No final line within the timeout
    Timeout,
    /// Module answered `ERROR` or `FAIL`
    Rejected,
    /// UART read or write failed
    Uart,
    /// Command did not fit the encode buffer
    Encode,
}

/// Data lines collected while waiting for a final line
#[derive(Debug, Default)]
struct Reply {
    address: Option<NetAddress>,
    time: Option<Option<i64>>,
    join_failure: Option<JoinFailure>,
}

/// ESP-AT session over a buffered UART
struct Modem {
    tx: BufferedUartTx,
    rx: BufferedUartRx,
    parser: LineParser,
    /// Reply timeout for `AT+CWJAP`, which waits for association and DHCP
    join_timeout_ms: u64,
    /// `WIFI GOT IP` seen, address not yet queried
    address_pending: bool,
}

impl Modem {
    fn new(tx: BufferedUartTx, rx: BufferedUartRx, config: &ClockConfig) -> Self {
        Self {
            tx,
            rx,
            parser: LineParser::new(),
            join_timeout_ms: u64::from(config.link.join_timeout_ms()),
            address_pending: false,
        }
    }

    /// Probe until the module answers, then put it in station mode
    async fn start(&mut self, config: &ClockConfig) {
        while let Err(e) = self.send(Command::Attention).await {
            debug!("Modem not answering: {:?}", e);
            Timer::after_millis(PROBE_RETRY_MS).await;
        }

        // The module reports UTC; offsets are applied by the time authority
        let setup = [
            Command::EchoOff,
            Command::StationMode,
            Command::ConfigureSntp {
                tz_hours: 0,
                server: config.time.server.as_str(),
            },
        ];
        for command in setup {
            if let Err(e) = self.send(command).await {
                warn!("Modem setup command {:?} failed: {:?}", command, e);
            }
        }
    }

    /// Read bytes until the next complete line
    async fn read_response(&mut self) -> Result<Response, ModemError> {
        let mut byte = [0u8; 1];
        loop {
            let n = self.rx.read(&mut byte).await.map_err(|_| ModemError::Uart)?;
            if n == 0 {
                continue;
            }
            match self.parser.feed(byte[0]) {
                Ok(Some(line)) => match core::str::from_utf8(&line) {
                    Ok(text) => return Ok(Response::parse(text)),
                    Err(_) => warn!("Modem line is not UTF-8, dropping"),
                },
                Ok(None) => {
                    // Need more bytes
                }
                Err(e) => {
                    warn!("Modem line error: {:?}", e);
                }
            }
        }
    }

    /// Send one command and wait for its final line
    async fn send(&mut self, command: Command<'_>) -> Result<Reply, ModemError> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let len = command.encode(&mut buf).map_err(|_| ModemError::Encode)?;
        self.tx
            .write_all(&buf[..len])
            .await
            .map_err(|_| ModemError::Uart)?;

        let timeout = if command.is_slow() {
            self.join_timeout_ms
        } else {
            REPLY_TIMEOUT_MS
        };
        match select(self.collect_reply(), Timer::after_millis(timeout)).await {
            Either::First(result) => result,
            Either::Second(()) => Err(ModemError::Timeout),
        }
    }

    async fn collect_reply(&mut self) -> Result<Reply, ModemError> {
        let mut reply = Reply::default();
        loop {
            match self.read_response().await? {
                Response::Ok => return Ok(reply),
                Response::Error | Response::Fail => {
                    if let Some(reason) = reply.join_failure {
                        warn!("Join refused: {:?}", reason);
                    }
                    return Err(ModemError::Rejected);
                }
                Response::Address(address) => reply.address = Some(address),
                Response::SntpTime(time) => reply.time = Some(time),
                Response::JoinFailed(reason) => reply.join_failure = Some(reason),
                other => self.notification(other),
            }
        }
    }

    /// Handle a line that is not part of a reply
    fn notification(&mut self, response: Response) {
        match response {
            Response::WifiConnected => debug!("Associated, waiting for address"),
            Response::WifiGotIp => self.address_pending = true,
            Response::WifiDisconnect => {
                info!("Association dropped");
                self.address_pending = false;
                set_link_status(LinkStatus::default());
                publish(response, None);
            }
            Response::Busy => debug!("Modem busy"),
            _ => {}
        }
    }

    /// Finish an association once DHCP has assigned an address
    async fn resolve_address(&mut self) {
        if !self.address_pending {
            return;
        }
        self.address_pending = false;

        match self.send(Command::QueryAddress).await {
            Ok(Reply {
                address: Some(address),
                ..
            }) if address != UNASSIGNED => {
                info!("Station address {}", address);
                set_link_status(LinkStatus {
                    up: true,
                    address: Some(address),
                });
                publish(Response::WifiGotIp, Some(address));
            }
            Ok(_) => warn!("Address query returned no address"),
            Err(e) => warn!("Address query failed: {:?}", e),
        }
    }

    async fn join(&mut self, config: &ClockConfig) {
        info!("Joining {}", config.network.ssid.as_str());
        let command = Command::Join {
            ssid: config.network.ssid.as_str(),
            password: config.network.password.as_str(),
        };
        // A failed join is left to the link supervisor's timeout
        if let Err(e) = self.send(command).await {
            warn!("Join failed: {:?}", e);
        }
    }

    async fn query_time(&mut self) {
        match self.send(Command::QueryTime).await {
            Ok(Reply {
                time: Some(Some(epoch)),
                ..
            }) => {
                debug!("SNTP time {}", epoch);
                SNTP_ANSWER.signal(SntpAnswer {
                    epoch,
                    received: Instant::now(),
                });
            }
            Ok(_) => debug!("SNTP not synchronised yet"),
            Err(e) => warn!("SNTP query failed: {:?}", e),
        }
    }
}

/// Forward the link event carried by `response`, if any
fn publish(response: Response, address: Option<NetAddress>) {
    if let Some(event) = response.link_event(address) {
        // Send to link event channel, dropping if full
        if LINK_EVENTS.try_send(event).is_err() {
            warn!("Link event channel full, dropping event");
        }
    }
}

/// Modem task - serves connect and sync requests, forwards link events
#[embassy_executor::task]
pub async fn modem_task(tx: BufferedUartTx, rx: BufferedUartRx, config: &'static ClockConfig) {
    info!("Modem task started");

    let mut modem = Modem::new(tx, rx, config);
    modem.start(config).await;
    info!("Modem ready");

    loop {
        modem.resolve_address().await;

        let next = select3(
            CONNECT_REQUEST.wait(),
            SYNC_REQUEST.wait(),
            modem.read_response(),
        )
        .await;

        match next {
            Either3::First(()) => modem.join(config).await,
            Either3::Second(()) => modem.query_time().await,
            Either3::Third(Ok(response)) => modem.notification(response),
            Either3::Third(Err(e)) => {
                warn!("UART read error: {:?}", e);
                Timer::after_millis(10).await;
            }
        }
    }
}
