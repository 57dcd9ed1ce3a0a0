// src/services/obfuscation_service.rs

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN},
    rand::{SecureRandom, SystemRandom},
};

use crate::{
    common::error::AppError,
    models::{plan::RestrictionKey, supplier::LocalizedText},
    services::plan_service,
};

// =========================================================================
//  1. MÁSCARA DE EXIBIÇÃO (não é criptografia)
// =========================================================================

/// Mascara o nome do fornecedor quando o plano do visitante esconde
/// fornecedores. Plano desconhecido também mascara.
pub fn mask_supplier_name(name: &str, plan_id: &str) -> String {
    if plan_service::is_feature_available(plan_id, RestrictionKey::EncryptedSuppliers) {
        return name.to_string();
    }
    mask(name)
}

// Conta caracteres, não bytes (nomes em árabe)
fn mask(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    match chars.as_slice() {
        [first, middle @ .., last] if !middle.is_empty() => {
            format!("{}{}{}", first, "*".repeat(middle.len()), last)
        }
        _ => "***".to_string(),
    }
}

pub fn mask_company_name(name: &LocalizedText, plan_id: &str) -> LocalizedText {
    LocalizedText {
        ar: mask_supplier_name(&name.ar, plan_id),
        en: mask_supplier_name(&name.en, plan_id),
    }
}

// =========================================================================
//  2. CODECS DE CAMPO (contatos gravados no documento)
// =========================================================================

pub trait FieldCodec: Send + Sync {
    fn encode(&self, plaintext: &str, context: &str) -> Result<String, AppError>;
    fn decode(&self, ciphertext: &str, context: &str) -> Result<String, AppError>;
}

/// AES-256-GCM com nonce aleatório por valor; o contexto entra como AAD,
/// então um valor copiado para outro campo não abre.
pub struct AeadCodec {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl AeadCodec {
    pub fn new(key_bytes: &[u8]) -> Result<Self, AppError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key_bytes)
            .map_err(|_| AppError::Codec("A chave deve ter 32 bytes.".into()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }
}

impl FieldCodec for AeadCodec {
    fn encode(&self, plaintext: &str, context: &str) -> Result<String, AppError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AppError::Codec("Falha ao gerar nonce".into()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(context.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| AppError::Codec("Falha ao cifrar".into()))?;

        // nonce ‖ cifrado ‖ tag
        let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        Ok(STANDARD.encode(out))
    }

    fn decode(&self, ciphertext: &str, context: &str) -> Result<String, AppError> {
        let raw = STANDARD
            .decode(ciphertext)
            .map_err(|e| AppError::Codec(format!("Base64 inválido: {}", e)))?;
        if raw.len() < NONCE_LEN {
            return Err(AppError::Codec("Valor cifrado truncado".into()));
        }

        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| AppError::Codec("Nonce inválido".into()))?;

        let mut in_out = sealed.to_vec();
        let plain = self
            .key
            .open_in_place(nonce, Aad::from(context.as_bytes()), &mut in_out)
            .map_err(|_| AppError::Codec("Falha de autenticação".into()))?;

        String::from_utf8(plain.to_vec()).map_err(|e| AppError::Codec(e.to_string()))
    }
}

/// Esquema antigo: XOR com chave rotativa + Base64. Sem autenticação.
/// Só serve para ler valores antigos e regravá-los com o `AeadCodec`.
pub struct LegacyXorCodec {
    key: Vec<u8>,
}

impl LegacyXorCodec {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn xor(&self, data: &[u8]) -> Result<Vec<u8>, AppError> {
        if self.key.is_empty() {
            return Err(AppError::Codec("Chave legada vazia".into()));
        }
        Ok(data
            .iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect())
    }
}

impl FieldCodec for LegacyXorCodec {
    fn encode(&self, plaintext: &str, _context: &str) -> Result<String, AppError> {
        Ok(STANDARD.encode(self.xor(plaintext.as_bytes())?))
    }

    fn decode(&self, ciphertext: &str, _context: &str) -> Result<String, AppError> {
        let raw = STANDARD
            .decode(ciphertext)
            .map_err(|e| AppError::Codec(format!("Base64 inválido: {}", e)))?;
        String::from_utf8(self.xor(&raw)?).map_err(|e| AppError::Codec(e.to_string()))
    }
}

// =========================================================================
//  3. SERVIÇO
// =========================================================================

// Prefixos de versão gravados junto do valor
const AEAD_PREFIX: &str = "v2:";
const LEGACY_PREFIX: &str = "v1:";

#[derive(Clone)]
pub struct ObfuscationService {
    codec: Arc<dyn FieldCodec>,
    legacy: Option<Arc<LegacyXorCodec>>,
}

impl ObfuscationService {
    pub fn new(codec: Arc<dyn FieldCodec>) -> Self {
        Self { codec, legacy: None }
    }

    pub fn with_legacy(mut self, legacy: LegacyXorCodec) -> Self {
        self.legacy = Some(Arc::new(legacy));
        self
    }

    /// Cifra um campo. Em caso de falha devolve o texto original.
    pub fn protect(&self, plaintext: &str, context: &str) -> String {
        match self.codec.encode(plaintext, context) {
            Ok(sealed) => format!("{}{}", AEAD_PREFIX, sealed),
            Err(e) => {
                tracing::warn!(context, "⚠️ Falha ao cifrar campo, gravando em claro: {}", e);
                plaintext.to_string()
            }
        }
    }

    /// Abre um campo gravado. Valores sem prefixo são texto puro.
    pub fn reveal(&self, stored: &str, context: &str) -> String {
        let result = if let Some(sealed) = stored.strip_prefix(AEAD_PREFIX) {
            self.codec.decode(sealed, context)
        } else if let Some(sealed) = stored.strip_prefix(LEGACY_PREFIX) {
            match &self.legacy {
                Some(legacy) => legacy.decode(sealed, context),
                None => Err(AppError::Codec("Codec legado não configurado".into())),
            }
        } else {
            return stored.to_string();
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(context, "⚠️ Falha ao abrir campo, devolvendo valor gravado: {}", e);
            stored.to_string()
        })
    }

    // Regrava um valor legado (ou em claro) no formato atual
    pub fn migrate(&self, stored: &str, context: &str) -> String {
        if stored.starts_with(AEAD_PREFIX) {
            return stored.to_string();
        }
        self.protect(&self.reveal(stored, context), context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ObfuscationService {
        let codec = AeadCodec::new(&[7u8; 32]).unwrap();
        ObfuscationService::new(Arc::new(codec)).with_legacy(LegacyXorCodec::new("segredo"))
    }

    #[test]
    fn masking_examples() {
        assert_eq!(mask_supplier_name("Al", "free"), "***");
        assert_eq!(mask_supplier_name("A", "free"), "***");
        assert_eq!(mask_supplier_name("", "free"), "***");
        assert_eq!(mask_supplier_name("Alpha", "free"), "A***a");
        assert_eq!(mask_supplier_name("Alpha", "professional"), "Alpha");
        assert_eq!(mask_supplier_name("Alpha", "basic"), "Alpha");
    }

    #[test]
    fn unknown_plan_masks() {
        assert_eq!(mask_supplier_name("Alpha", "platinum"), "A***a");
    }

    #[test]
    fn masking_counts_characters_not_bytes() {
        assert_eq!(mask_supplier_name("شركة", "free"), "ش**ة");
    }

    #[test]
    fn aead_round_trip_is_bound_to_context() {
        let codec = AeadCodec::new(&[1u8; 32]).unwrap();
        let sealed = codec.encode("+966500000000", "supplier:1:phone").unwrap();

        assert_ne!(sealed, codec.encode("+966500000000", "supplier:1:phone").unwrap());
        assert_eq!(codec.decode(&sealed, "supplier:1:phone").unwrap(), "+966500000000");
        assert!(codec.decode(&sealed, "supplier:2:phone").is_err());
    }

    #[test]
    fn aead_rejects_wrong_key_length() {
        assert!(AeadCodec::new(&[0u8; 16]).is_err());
    }

    #[test]
    fn legacy_codec_is_symmetric() {
        let codec = LegacyXorCodec::new("k3y");
        let encoded = codec.encode("contato@empresa.sa", "").unwrap();
        assert_ne!(encoded, "contato@empresa.sa");
        assert_eq!(codec.decode(&encoded, "").unwrap(), "contato@empresa.sa");
        assert!(LegacyXorCodec::new("").encode("x", "").is_err());
    }

    #[test]
    fn reveal_falls_back_to_stored_value() {
        let svc = service();
        assert_eq!(svc.reveal("texto puro", "ctx"), "texto puro");
        assert_eq!(svc.reveal("v2:não-é-base64", "ctx"), "v2:não-é-base64");

        let sealed = svc.protect("segredo", "ctx");
        assert!(sealed.starts_with("v2:"));
        assert_eq!(svc.reveal(&sealed, "ctx"), "segredo");
        assert_eq!(svc.reveal(&sealed, "outro"), sealed);
    }

    #[test]
    fn legacy_values_are_migrated() {
        let svc = service();
        let old = format!("v1:{}", LegacyXorCodec::new("segredo").encode("+966511111111", "").unwrap());

        let migrated = svc.migrate(&old, "supplier:9:phone");
        assert!(migrated.starts_with("v2:"));
        assert_eq!(svc.reveal(&migrated, "supplier:9:phone"), "+966511111111");
    }
}
