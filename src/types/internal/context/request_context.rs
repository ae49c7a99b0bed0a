use std::net::IpAddr;

use poem::Request;

use crate::types::internal::Principal;

use super::request_id::RequestId;

/// Request context that flows through all layers
///
/// Carries the authenticated principal explicitly so access checks never
/// depend on ambient state, plus the metadata used for tracing.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// The authenticated user
    pub principal: Principal,
}

impl RequestContext {
    /// Create a context for an already authenticated principal
    pub fn new(principal: Principal) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            principal,
        }
    }

    /// Create a context from an HTTP request and the principal resolved for it
    pub fn from_request(req: &Request, principal: Principal) -> Self {
        Self::new(principal).with_ip_address(Self::extract_ip_address(req))
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: Option<IpAddr>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Id of the acting user
    pub fn actor_id(&self) -> i32 {
        self.principal.user_id
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
