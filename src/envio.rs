// ── Envio Individual (/gerar_das) ───────────────────────────────
use crate::client::{DasClient, GerarDasForm};
use crate::feedback::{
    apresentar_envio, Banner, BannerStyle, SingleFeedback, SingleOutcome, SubmissionState,
    DAS_GERADO,
};
use crate::parcela::ParcelaMask;
use crate::sistema;

/// Formulário de emissão individual com seus dois banners.
///
/// O banner de erro é um só e é reescrito a cada falha, nunca empilhado.
#[derive(Debug, Clone)]
pub struct SingleFormView {
    form: GerarDasForm,
    mascara: ParcelaMask,
    pub sucesso: Banner,
    pub erro: Banner,
}

impl SingleFormView {
    pub fn new() -> Self {
        Self {
            form: GerarDasForm::default(),
            mascara: ParcelaMask,
            sucesso: Banner::oculto(BannerStyle::Success),
            erro: Banner::oculto(BannerStyle::Danger),
        }
    }

    pub fn form(&self) -> &GerarDasForm {
        &self.form
    }

    pub fn preencher_contribuinte(&mut self, contribuinte: &str, tipo: &str) {
        self.form.contribuinte = contribuinte.to_string();
        self.form.tipo_contribuinte = tipo.to_string();
    }

    /// Evento de mudança do seletor: o serviço acompanha o sistema.
    pub fn selecionar_sistema(&mut self, id_sistema: &str) {
        self.form.id_sistema = id_sistema.to_string();
        self.form.id_servico = sistema::ao_mudar_sistema(id_sistema);
    }

    pub fn digitar_parcela(&mut self, bruto: &str) {
        self.form.parcela_para_emitir = self.mascara.aplicar(bruto);
    }

    fn aplicar(&mut self, feedback: &SingleFeedback) {
        if feedback.sucesso_visivel {
            self.sucesso = Banner::visivel(BannerStyle::Success, DAS_GERADO);
        }
        if let Some(texto) = &feedback.erro {
            self.erro = Banner::visivel(BannerStyle::Danger, texto.as_str());
        }
        if feedback.limpar_formulario {
            self.form = GerarDasForm::default();
        }
    }
}

impl Default for SingleFormView {
    fn default() -> Self {
        Self::new()
    }
}

/// Controlador do formulário de emissão individual.
///
/// Não há trava contra envio duplo: cada chamada a [`submit`](Self::submit)
/// dispara uma requisição.
#[derive(Debug)]
pub struct SingleSubmitController {
    client: DasClient,
    pub view: SingleFormView,
    estado: SubmissionState,
}

impl SingleSubmitController {
    pub fn new(client: DasClient) -> Self {
        Self {
            client,
            view: SingleFormView::new(),
            estado: SubmissionState::Idle,
        }
    }

    pub fn estado(&self) -> SubmissionState {
        self.estado
    }

    pub async fn submit(&mut self) -> SubmissionState {
        self.view.sucesso.ocultar();
        self.view.erro.ocultar();
        self.estado = SubmissionState::Submitting;

        let outcome = match self.client.gerar_das(self.view.form()).await {
            Ok(resposta) => {
                if resposta.status != 200 {
                    tracing::warn!(
                        status = resposta.status,
                        corpo = %resposta.corpo,
                        "backend recusou o pedido de DAS"
                    );
                }
                SingleOutcome::Resposta {
                    status: resposta.status,
                    corpo: resposta.corpo,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Erro ao enviar o formulário");
                SingleOutcome::FalhaTransporte
            }
        };

        let feedback = apresentar_envio(&outcome);
        self.view.aplicar(&feedback);
        self.estado = feedback.estado;
        if self.estado == SubmissionState::Succeeded {
            tracing::info!("DAS gerado");
        }
        self.estado
    }
}
