use crate::parser::{
    CaddyJsonParser, GoAccessParser, InitError, NginxCombinedParser, NginxJsonParser, Parser,
    RsyncProxyParser, TencentCdnParser,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

type ParserBuilder = fn() -> Result<Arc<dyn Parser>, InitError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown parser '{0}' (see `bandwatch list parsers`)")]
    Unknown(String),

    #[error("failed to set up parser '{name}': {source}")]
    Init {
        name: &'static str,
        #[source]
        source: InitError,
    },
}

/// A named log format.
#[derive(Clone)]
pub struct ParserMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Aliases are hidden from the default listing.
    pub hidden: bool,
    build: ParserBuilder,
}

impl ParserMeta {
    const fn new(name: &'static str, description: &'static str, build: ParserBuilder) -> Self {
        Self {
            name,
            description,
            hidden: false,
            build,
        }
    }

    const fn alias(name: &'static str, description: &'static str, build: ParserBuilder) -> Self {
        Self {
            name,
            description,
            hidden: true,
            build,
        }
    }

    pub fn build(&self) -> Result<Arc<dyn Parser>, RegistryError> {
        (self.build)().map_err(|source| RegistryError::Init {
            name: self.name,
            source,
        })
    }
}

fn build_nginx_json() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(NginxJsonParser))
}

fn build_nginx_combined() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(NginxCombinedParser))
}

fn build_caddy_json() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(CaddyJsonParser))
}

fn build_tencent_cdn() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(TencentCdnParser))
}

fn build_rsync_proxy() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(RsyncProxyParser))
}

fn build_goaccess() -> Result<Arc<dyn Parser>, InitError> {
    Ok(Arc::new(GoAccessParser::from_env()?))
}

fn builtin_parsers() -> [ParserMeta; 10] {
    [
        ParserMeta::new(
            "nginx-json",
            "nginx JSON log with timestamp, clientip, serverip, url, size and user_agent",
            build_nginx_json,
        ),
        ParserMeta::alias("ngx_json", "An alias for `nginx-json`", build_nginx_json),
        ParserMeta::new(
            "nginx-combined",
            "nginx's default `combined` format",
            build_nginx_combined,
        ),
        ParserMeta::alias(
            "combined",
            "An alias for `nginx-combined`",
            build_nginx_combined,
        ),
        ParserMeta::new("caddy-json", "Caddy's default JSON format", build_caddy_json),
        ParserMeta::alias("caddy", "An alias for `caddy-json`", build_caddy_json),
        ParserMeta::new("tencent-cdn", "Tencent CDN log format", build_tencent_cdn),
        ParserMeta::alias("tcdn", "An alias for `tencent-cdn`", build_tencent_cdn),
        ParserMeta::new("rsync-proxy", "rsync-proxy's access.log", build_rsync_proxy),
        ParserMeta::new(
            "goaccess",
            "Any GoAccess log-format, configured by the file in $GOACCESS_CONFIG",
            build_goaccess,
        ),
    ]
}

/// Name → parser lookup, resolved once at startup.
pub struct ParserRegistry {
    parsers: BTreeMap<&'static str, ParserMeta>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParserRegistry {
    pub fn builtin() -> Self {
        Self {
            parsers: builtin_parsers()
                .into_iter()
                .map(|meta| (meta.name, meta))
                .collect(),
        }
    }

    pub fn build(&self, name: &str) -> Result<Arc<dyn Parser>, RegistryError> {
        self.parsers
            .get(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?
            .build()
    }

    /// Registered formats in name order; aliases only when `include_hidden`.
    pub fn list(&self, include_hidden: bool) -> impl Iterator<Item = &ParserMeta> {
        self.parsers
            .values()
            .filter(move |meta| include_hidden || !meta.hidden)
    }
}
