//! Default password generation

use crate::error::{Error, Result};

use super::PasswordSet;

/// Source of freshly generated default passwords
pub trait PasswordGenerator {
    /// Produce a complete default password set.
    fn generate(&self) -> Result<PasswordSet>;
}

/// A fixed set acts as its own generator.
impl PasswordGenerator for PasswordSet {
    fn generate(&self) -> Result<PasswordSet> {
        Ok(self.clone())
    }
}

/// Heat parameters that hold undercloud service secrets
pub const PASSWORD_PARAMETER_NAMES: &[&str] = &[
    "AdminPassword",
    "AdminToken",
    "AodhPassword",
    "BarbicanPassword",
    "CeilometerMeteringSecret",
    "CeilometerPassword",
    "CinderPassword",
    "CongressPassword",
    "DesignatePassword",
    "GlancePassword",
    "GnocchiPassword",
    "HAProxyStatsPassword",
    "HeatAuthEncryptionKey",
    "HeatPassword",
    "HeatStackDomainAdminPassword",
    "HorizonSecret",
    "IronicPassword",
    "ManilaPassword",
    "MistralPassword",
    "MysqlClustercheckPassword",
    "MysqlRootPassword",
    "NeutronMetadataProxySharedSecret",
    "NeutronPassword",
    "NovaPassword",
    "PankoPassword",
    "PcsdPassword",
    "PlacementPassword",
    "RabbitCookie",
    "RabbitPassword",
    "RedisPassword",
    "SaharaPassword",
    "SwiftHashSuffix",
    "SwiftPassword",
    "TrovePassword",
    "ZaqarPassword",
];

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates alphanumeric secrets from the operating system RNG
#[derive(Debug, Clone)]
pub struct RandomPasswordGenerator {
    length: usize,
}

impl Default for RandomPasswordGenerator {
    fn default() -> Self {
        Self { length: 25 }
    }
}

impl RandomPasswordGenerator {
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }

    fn secret(&self) -> Result<String> {
        // Largest multiple of the alphabet size that fits in a byte; bytes at
        // or above it are discarded so every character is equally likely.
        let limit = (256 / ALPHABET.len() * ALPHABET.len()) as u8;
        let mut out = String::with_capacity(self.length);
        let mut buf = [0u8; 64];
        while out.len() < self.length {
            getrandom::getrandom(&mut buf).map_err(|e| Error::PasswordGeneration {
                message: e.to_string(),
            })?;
            for byte in buf.iter().copied().filter(|b| *b < limit) {
                if out.len() == self.length {
                    break;
                }
                out.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
            }
        }
        Ok(out)
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self) -> Result<PasswordSet> {
        PASSWORD_PARAMETER_NAMES
            .iter()
            .map(|name| Ok((name.to_string(), self.secret()?)))
            .collect()
    }
}
