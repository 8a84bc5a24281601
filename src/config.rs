use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Default base of the dashboard API.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    /// Bearer token for the API. Not validated locally; a bad or missing key
    /// shows up as an authentication failure from the remote call.
    #[serde(deserialize_with = "string_or_number")]
    pub api_key: String,
    /// Dashboard organization ids are numeric, so config files and env
    /// providers may hand this over as an integer.
    #[serde(deserialize_with = "string_or_number")]
    pub org_id: String,
    pub base_url: String,
    pub template_path: PathBuf,
    pub id_base: u64,
    /// Print the payload instead of submitting it.
    pub dry_run: bool,
    /// Exit non-zero when the bulk write is rejected or never reaches the API.
    pub fail_on_reject: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            org_id: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            template_path: PathBuf::from("peerPayload.json"),
            id_base: 1000,
            dry_run: false,
            fail_on_reject: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("org_id", &self.org_id)
            .field("base_url", &self.base_url)
            .field("template_path", &self.template_path)
            .field("id_base", &self.id_base)
            .field("dry_run", &self.dry_run)
            .field("fail_on_reject", &self.fail_on_reject)
            .finish()
    }
}

/// Credentials under the names the dashboard tooling uses.
const CREDENTIAL_VARS: [(&str, &str); 2] = [("api_key", "M_API_KEY"), ("org_id", "M_ORG_ID")];

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("vpnpeer-gen.toml"))
            .merge(Json::file("vpnpeer-gen.json"))
            .merge(Env::prefixed("VPNPEER_"));

        // Taken verbatim: Env would parse `0123` into the integer 123.
        for (key, var) in CREDENTIAL_VARS {
            if let Ok(value) = env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
