//! Static policy text served by the `/privacy` and `/terms` routes.

pub(super) const PRIVACY: &str = "\
Privacy Policy

This service receives slash-command and button interactions from the chat platform and uses
the domain names you submit solely to perform the requested DNS lookups. Queried names are
written to transient server logs for operational troubleshooting and are not shared, sold,
or retained beyond normal log rotation. No account data, message history, or member
information is requested or stored.
";

pub(super) const TERMS: &str = "\
Terms of Service

This service is provided as-is, without warranty of any kind. DNS answers are relayed from
public resolvers and may be stale or incorrect; do not rely on them for security decisions.
Abusive query volume may be blocked. By using the service you accept these terms.
";
