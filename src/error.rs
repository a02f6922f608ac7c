//! Erros do cliente do backend de DAS.

/// Falhas de uma chamada ao backend.
///
/// Nenhuma destas mensagens chega ao usuário: os controladores registram a
/// causa com `tracing` e exibem o texto fixo do banner.
#[derive(Debug, thiserror::Error)]
pub enum DasClientError {
    /// Falha de transporte (conexão, timeout, leitura do corpo).
    #[error("falha HTTP ao chamar {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// O backend respondeu com status fora da faixa 2xx.
    #[error("{endpoint} retornou status {status}")]
    Status { endpoint: String, status: u16 },
    /// O corpo da resposta não é o JSON esperado.
    #[error("resposta inválida de {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Não foi possível ler o arquivo a enviar.
    #[error("falha ao ler o arquivo '{caminho}': {source}")]
    Arquivo {
        caminho: String,
        source: std::io::Error,
    },
    /// O backend devolveu o formulário de login: credenciais recusadas.
    #[error("Usuário ou senha inválidos ({usuario})")]
    Login { usuario: String },
    #[error("erro de configuração: {0}")]
    Config(#[from] crate::config::ConfigError),
}
