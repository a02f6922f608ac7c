// ── Envio em Lote (/enviar_em_lote) ─────────────────────────────
use crate::client::{ArquivoLote, DasClient, RespostaLote};
use crate::error::DasClientError;
use crate::feedback::{
    apresentar_lote, progresso_lote, Banner, BannerStyle, BatchFeedback, BatchOutcome,
    DetailPanel, SubmissionState,
};

/// Formulário do lote: arquivo, banner de status, painel de detalhes e botão.
#[derive(Debug, Clone)]
pub struct BatchFormView {
    pub arquivo: Option<ArquivoLote>,
    pub banner: Banner,
    pub detalhe: DetailPanel,
    pub botao_habilitado: bool,
}

impl BatchFormView {
    pub fn new() -> Self {
        Self {
            arquivo: None,
            banner: Banner::oculto(BannerStyle::Info),
            detalhe: DetailPanel::default(),
            botao_habilitado: true,
        }
    }

    fn iniciar(&mut self) {
        self.banner = progresso_lote();
        self.detalhe.visivel = false;
        self.botao_habilitado = false;
    }

    fn aplicar(&mut self, feedback: BatchFeedback) {
        self.banner = feedback.banner;
        self.detalhe = feedback.detalhe;
    }
}

impl Default for BatchFormView {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifica a resposta do lote no desfecho que define a apresentação.
///
/// `resultados` só é lido depois da mensagem de conclusão. Uma conclusão sem
/// lista legível conta como erro: não há resumo a montar.
pub fn classificar(resposta: Result<RespostaLote, DasClientError>) -> BatchOutcome {
    match resposta {
        Ok(resposta) if resposta.concluido() => match resposta.resultados() {
            Some(resultados) => BatchOutcome::Concluido(resultados),
            None => {
                tracing::error!("lote concluído sem uma lista de resultados legível");
                BatchOutcome::Erro
            }
        },
        Ok(resposta) => {
            tracing::warn!(message = ?resposta.message, "lote não iniciado pelo backend");
            BatchOutcome::FalhaLogica
        }
        Err(e) => {
            tracing::error!(error = %e, "Erro ao enviar o arquivo");
            BatchOutcome::Erro
        }
    }
}

#[derive(Debug)]
pub struct BatchSubmitController {
    client: DasClient,
    pub view: BatchFormView,
    estado: SubmissionState,
}

impl BatchSubmitController {
    pub fn new(client: DasClient) -> Self {
        Self {
            client,
            view: BatchFormView::new(),
            estado: SubmissionState::Idle,
        }
    }

    pub fn estado(&self) -> SubmissionState {
        self.estado
    }

    /// Um ciclo de envio. Com o botão desabilitado a submissão é ignorada.
    pub async fn submit(&mut self) -> SubmissionState {
        if !self.view.botao_habilitado {
            tracing::debug!("envio em lote já em andamento, submissão ignorada");
            return self.estado;
        }

        self.view.iniciar();
        self.estado = SubmissionState::Submitting;

        let resposta = self.client.enviar_em_lote(self.view.arquivo.as_ref()).await;
        let feedback = apresentar_lote(&classificar(resposta));
        self.estado = feedback.estado;
        if self.estado == SubmissionState::Succeeded {
            tracing::info!(registros = feedback.detalhe.linhas.len(), "lote concluído");
        }
        self.view.aplicar(feedback);

        self.view.botao_habilitado = true;
        self.estado
    }
}
