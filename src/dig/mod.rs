//! DNS lookup collaborator behind the `dig` command.
//!
//! Dispatch and the deferred protocol only see the narrow [`DnsQuerier`] trait; how a name is
//! actually resolved is this module's business. The provided [`UdpQuerier`] asks a single
//! configured upstream recursive resolver over UDP.

use crate::config::Config;
use crate::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use trust_dns_client::client::{AsyncClient, ClientHandle};
use trust_dns_client::rr::{DNSClass, Name, RecordType};
use trust_dns_client::udp::UdpClientStream;

pub mod command;

pub type SharedQuerier = Arc<dyn DnsQuerier>;

/// One DNS question, answered as display-ready record lines.
#[async_trait::async_trait]
pub trait DnsQuerier: Send + Sync {
    async fn lookup(&self, name: &Name, record_type: RecordType) -> Result<Vec<String>, Error>;
}

/// Queries the configured upstream resolver over UDP, bounded by the configured timeout.
pub struct UdpQuerier {
    resolver_addr: SocketAddr,
    timeout: Duration,
}

impl UdpQuerier {
    pub fn new(config: &Config) -> Self {
        Self {
            resolver_addr: config.resolver_addr,
            timeout: config.dns_timeout,
        }
    }
}

#[async_trait::async_trait]
impl DnsQuerier for UdpQuerier {
    async fn lookup(&self, name: &Name, record_type: RecordType) -> Result<Vec<String>, Error> {
        let stream = UdpClientStream::<UdpSocket>::with_timeout(self.resolver_addr, self.timeout);
        let (mut client, background) = AsyncClient::connect(stream).await?;
        let background = tokio::spawn(background);

        let response = client.query(name.clone(), DNSClass::IN, record_type).await;
        // The exchange background finishes once the client is dropped.
        drop(client);
        let response = response?;
        background.abort();

        Ok(response
            .answers()
            .iter()
            .filter_map(|record| {
                record.data().map(|rdata| {
                    format!(
                        "{} {} {} {}",
                        record.name(),
                        record.ttl(),
                        record.record_type(),
                        rdata
                    )
                })
            })
            .collect())
    }
}
