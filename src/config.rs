//! Configuração do cliente do backend de DAS.
//!
//! Por padrão aponta para o servidor local. Sobrescreva via variáveis de
//! ambiente ou construção explícita.

use url::Url;

const URL_PADRAO: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct DasConfig {
    /// Origem que serve `/gerar_das` e `/enviar_em_lote`.
    pub base_url: Url,
    /// Timeout por requisição. `None` deixa a requisição aguardar indefinidamente.
    pub timeout_secs: Option<u64>,
    /// Login do backend. Sem ele as rotas protegidas redirecionam para `/login`.
    pub credenciais: Option<Credenciais>,
}

/// Usuário e senha do formulário de login.
///
/// `Debug` esconde a senha para que ela não vá parar no log.
#[derive(Clone, PartialEq, Eq)]
pub struct Credenciais {
    pub usuario: String,
    pub senha: String,
}

impl Credenciais {
    pub fn new(usuario: impl Into<String>, senha: impl Into<String>) -> Self {
        Self {
            usuario: usuario.into(),
            senha: senha.into(),
        }
    }
}

impl std::fmt::Debug for Credenciais {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credenciais")
            .field("usuario", &self.usuario)
            .field("senha", &"[REDACTED]")
            .finish()
    }
}

impl DasConfig {
    /// Lê a configuração do ambiente.
    ///
    /// Variáveis:
    /// - `DAS_BASE_URL` (padrão: `http://127.0.0.1:5000`)
    /// - `DAS_TIMEOUT_SECS` (padrão: sem timeout)
    /// - `DAS_USUARIO` e `DAS_SENHA` (padrão: sem login; só valem juntas)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("DAS_BASE_URL").unwrap_or_else(|_| URL_PADRAO.to_string());
        let credenciais = match (std::env::var("DAS_USUARIO"), std::env::var("DAS_SENHA")) {
            (Ok(usuario), Ok(senha)) => Some(Credenciais::new(usuario, senha)),
            _ => None,
        };
        Ok(Self {
            base_url: parse_url("DAS_BASE_URL", &raw)?,
            timeout_secs: parse_timeout(std::env::var("DAS_TIMEOUT_SECS").ok().as_deref())?,
            credenciais,
        })
    }

    /// Configuração apontando para um servidor específico, sem timeout.
    pub fn local(base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base)?,
            timeout_secs: None,
            credenciais: None,
        })
    }

    /// URL absoluta de um endpoint do backend.
    pub fn endpoint(&self, caminho: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(caminho)
            .map_err(|e| ConfigError::InvalidUrl(caminho.to_string(), e.to_string()))
    }
}

fn parse_url(origem: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(origem.to_string(), e.to_string()))
}

/// Valor ausente desliga o timeout; valor presente precisa ser um inteiro.
fn parse_timeout(raw: Option<&str>) -> Result<Option<u64>, ConfigError> {
    raw.map(|s| {
        s.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout(s.to_string()))
    })
    .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("URL inválida para {0}: {1}")]
    InvalidUrl(String, String),
    #[error("DAS_TIMEOUT_SECS inválido: '{0}' (esperado um número de segundos)")]
    InvalidTimeout(String),
}
