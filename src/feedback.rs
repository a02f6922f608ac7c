//! Estado de envio e apresentação dos banners.
//!
//! Os controladores não decidem o que mostrar: eles classificam o desfecho
//! de uma requisição e pedem a apresentação às funções puras deste módulo,
//! aplicando depois o resultado nas suas próprias views.

use std::fmt;

use serde_json::Value;

use crate::client::ResultadoLote;

// ── Textos exibidos ─────────────────────────────────────────────

pub const DAS_GERADO: &str = "Documento DAS gerado com sucesso!";
pub const ERRO_ENVIO_GENERICO: &str = "Erro ao enviar. Por favor, tente novamente.";
pub const LOTE_EM_ANDAMENTO: &str = "Envio em lote em andamento. Por favor, aguarde...";
pub const LOTE_SUCESSO: &str = "Envio em lote concluído com sucesso!";
pub const LOTE_FALHA: &str = "Erro ao iniciar o envio em lote.";
pub const LOTE_ERRO_ARQUIVO: &str = "Erro ao enviar o arquivo. Verifique os detalhes abaixo.";
pub const LOTE_NAO_INICIADO: &str =
    "Não foi possível iniciar o envio. Verifique o arquivo e tente novamente.";
pub const RESUMO_TITULO: &str = "Resumo do envio:";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    Info,
    Success,
    Danger,
}

impl BannerStyle {
    /// Classe do alerta na página.
    pub fn classe(&self) -> &'static str {
        match self {
            BannerStyle::Info => "alert-info",
            BannerStyle::Success => "alert-success",
            BannerStyle::Danger => "alert-danger",
        }
    }
}

/// Linha de status. Criada uma vez por view e alternada entre visível e oculta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub estilo: BannerStyle,
    pub texto: String,
    pub visivel: bool,
}

impl Banner {
    pub fn oculto(estilo: BannerStyle) -> Self {
        Self {
            estilo,
            texto: String::new(),
            visivel: false,
        }
    }

    pub fn visivel(estilo: BannerStyle, texto: impl Into<String>) -> Self {
        Self {
            estilo,
            texto: texto.into(),
            visivel: true,
        }
    }

    pub fn ocultar(&mut self) {
        self.visivel = false;
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.estilo.classe(), self.texto)
    }
}

/// Bloco com uma linha por registro do lote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanel {
    pub titulo: Option<String>,
    pub linhas: Vec<String>,
    pub visivel: bool,
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(titulo) = &self.titulo {
            writeln!(f, "{titulo}")?;
        }
        for linha in &self.linhas {
            writeln!(f, "{linha}")?;
        }
        Ok(())
    }
}

// ── Envio individual ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SingleOutcome {
    /// O backend respondeu com um corpo JSON.
    Resposta { status: u16, corpo: Value },
    /// Falha de rede ou corpo ilegível.
    FalhaTransporte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleFeedback {
    pub estado: SubmissionState,
    pub sucesso_visivel: bool,
    /// Texto do banner de erro, quando houver erro.
    pub erro: Option<String>,
    pub limpar_formulario: bool,
}

pub fn apresentar_envio(outcome: &SingleOutcome) -> SingleFeedback {
    match outcome {
        SingleOutcome::Resposta { status: 200, .. } => SingleFeedback {
            estado: SubmissionState::Succeeded,
            sucesso_visivel: true,
            erro: None,
            limpar_formulario: true,
        },
        SingleOutcome::Resposta { corpo, .. } => falha_envio(mensagem_de_erro(corpo)),
        SingleOutcome::FalhaTransporte => falha_envio(ERRO_ENVIO_GENERICO.to_string()),
    }
}

fn falha_envio(texto: String) -> SingleFeedback {
    SingleFeedback {
        estado: SubmissionState::Failed,
        sucesso_visivel: false,
        erro: Some(texto),
        limpar_formulario: false,
    }
}

/// `mensagem` tem precedência sobre `error`; strings vazias não contam.
fn mensagem_de_erro(corpo: &Value) -> String {
    ["mensagem", "error"]
        .into_iter()
        .filter_map(|campo| corpo.get(campo).and_then(Value::as_str))
        .find(|texto| !texto.is_empty())
        .map(|texto| format!("Erro ao enviar: {texto}"))
        .unwrap_or_else(|| ERRO_ENVIO_GENERICO.to_string())
}

// ── Envio em lote ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Mensagem de conclusão recebida, com o resumo por registro.
    Concluido(Vec<ResultadoLote>),
    /// Resposta 2xx com qualquer outra mensagem.
    FalhaLogica,
    /// Rede, status fora de 2xx ou corpo ilegível.
    Erro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFeedback {
    pub estado: SubmissionState,
    pub banner: Banner,
    pub detalhe: DetailPanel,
}

/// Banner mostrado enquanto o lote aguarda resposta.
pub fn progresso_lote() -> Banner {
    Banner::visivel(BannerStyle::Info, LOTE_EM_ANDAMENTO)
}

pub fn apresentar_lote(outcome: &BatchOutcome) -> BatchFeedback {
    match outcome {
        BatchOutcome::Concluido(resultados) => BatchFeedback {
            estado: SubmissionState::Succeeded,
            banner: Banner::visivel(BannerStyle::Success, LOTE_SUCESSO),
            detalhe: DetailPanel {
                titulo: Some(RESUMO_TITULO.to_string()),
                linhas: resultados.iter().map(linha_resultado).collect(),
                visivel: true,
            },
        },
        BatchOutcome::FalhaLogica => BatchFeedback {
            estado: SubmissionState::Failed,
            banner: Banner::visivel(BannerStyle::Danger, LOTE_FALHA),
            detalhe: DetailPanel::default(),
        },
        // Aqui o painel aparece com a explicação, ao contrário da falha lógica.
        BatchOutcome::Erro => BatchFeedback {
            estado: SubmissionState::Failed,
            banner: Banner::visivel(BannerStyle::Danger, LOTE_ERRO_ARQUIVO),
            detalhe: DetailPanel {
                titulo: None,
                linhas: vec![LOTE_NAO_INICIADO.to_string()],
                visivel: true,
            },
        },
    }
}

pub fn linha_resultado(resultado: &ResultadoLote) -> String {
    format!(
        "CNPJ: {} - Status: {} - Mensagem: {}",
        texto(&resultado.cnpj),
        texto(&resultado.status),
        texto(&resultado.mensagem)
    )
}

fn texto(valor: &Value) -> String {
    match valor {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        outro => outro.to_string(),
    }
}
