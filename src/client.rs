// ── Cliente do Backend de DAS ───────────────────────────────────
//
// | Método | Caminho           | Corpo                          |
// |--------|-------------------|--------------------------------|
// | POST   | `/gerar_das`      | multipart com os campos do DAS |
// | POST   | `/enviar_em_lote` | multipart com `fileUpload`     |
// | POST   | `/login`          | formulário `username/password` |
// | GET    | `/consultar_requisicoes` | `?contribuinte=` opcional |
// | GET    | `/baixar_recibo/{id}`    | PDF da guia               |
// | GET    | `/baixar_todos_recibos`  | ZIP com todas as guias    |

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::config::DasConfig;
use crate::error::DasClientError;
use crate::historico::{nome_do_anexo, Recibo, Requisicao};

const GERAR_DAS: &str = "/gerar_das";
const ENVIAR_EM_LOTE: &str = "/enviar_em_lote";
const LOGIN: &str = "/login";
const CONSULTAR_REQUISICOES: &str = "/consultar_requisicoes";
const BAIXAR_RECIBO: &str = "/baixar_recibo";
const BAIXAR_TODOS_RECIBOS: &str = "/baixar_todos_recibos";

/// Campo do arquivo lido pelo backend no envio em lote.
pub const CAMPO_ARQUIVO: &str = "fileUpload";

/// Mensagem com que o backend sinaliza um lote processado.
pub const LOTE_CONCLUIDO: &str = "Envio em lote concluído";

/// Campos do formulário de emissão individual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GerarDasForm {
    pub contribuinte: String,
    pub tipo_contribuinte: String,
    pub id_sistema: String,
    pub id_servico: String,
    pub parcela_para_emitir: String,
}

impl GerarDasForm {
    fn to_multipart(&self) -> Form {
        Form::new()
            .text("contribuinte", self.contribuinte.clone())
            .text("tipo_contribuinte", self.tipo_contribuinte.clone())
            .text("id_sistema", self.id_sistema.clone())
            .text("id_servico", self.id_servico.clone())
            .text("parcela_para_emitir", self.parcela_para_emitir.clone())
    }
}

/// Resposta de `/gerar_das`: o status e o corpo JSON, qualquer que seja o status.
#[derive(Debug, Clone, PartialEq)]
pub struct RespostaGerarDas {
    pub status: u16,
    pub corpo: Value,
}

/// Planilha enviada no lote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArquivoLote {
    pub nome: String,
    pub conteudo: Vec<u8>,
}

impl ArquivoLote {
    pub fn new(nome: impl Into<String>, conteudo: Vec<u8>) -> Self {
        Self {
            nome: nome.into(),
            conteudo,
        }
    }

    pub async fn from_path(caminho: &Path) -> Result<Self, DasClientError> {
        let conteudo = tokio::fs::read(caminho)
            .await
            .map_err(|e| DasClientError::Arquivo {
                caminho: caminho.display().to_string(),
                source: e,
            })?;
        let nome = caminho
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { nome, conteudo })
    }

    fn to_part(&self) -> Part {
        Part::bytes(self.conteudo.clone()).file_name(self.nome.clone())
    }
}

/// Uma linha do resumo devolvido pelo envio em lote.
///
/// O backend lê a planilha com tipos livres, então um CNPJ pode chegar como
/// número; os campos guardam o JSON cru.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultadoLote {
    #[serde(rename = "CNPJ", default)]
    pub cnpj: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub mensagem: Value,
}

/// Corpo de uma resposta 2xx de `/enviar_em_lote`.
///
/// `resultados` fica cru: só é lido quando a mensagem de conclusão chega.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RespostaLote {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub resultados: Option<Value>,
}

impl RespostaLote {
    pub fn concluido(&self) -> bool {
        self.message.as_ref().and_then(Value::as_str) == Some(LOTE_CONCLUIDO)
    }

    /// Resumo por registro. `None` quando ausente ou fora do formato.
    pub fn resultados(&self) -> Option<Vec<ResultadoLote>> {
        let bruto = self.resultados.as_ref()?;
        match serde_json::from_value(bruto.clone()) {
            Ok(resultados) => Some(resultados),
            Err(e) => {
                tracing::error!(error = %e, "resultados do lote fora do formato");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DasClient {
    http: reqwest::Client,
    config: DasConfig,
}

impl DasClient {
    pub fn new(config: DasConfig) -> Result<Self, DasClientError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| DasClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DasConfig {
        &self.config
    }

    /// Abre a sessão no backend. O cookie fica no cliente e segue nas
    /// chamadas seguintes, inclusive nos clones.
    ///
    /// O backend redireciona para a página inicial quando aceita as
    /// credenciais e devolve de novo o formulário de login quando recusa.
    pub async fn login(&self, usuario: &str, senha: &str) -> Result<(), DasClientError> {
        let url = self.config.endpoint(LOGIN)?;
        tracing::debug!(%url, usuario, "abrindo sessão");

        let response = self
            .http
            .post(url)
            .form(&[("username", usuario), ("password", senha)])
            .send()
            .await
            .map_err(|e| http_error(LOGIN, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DasClientError::Status {
                endpoint: LOGIN.into(),
                status: status.as_u16(),
            });
        }
        if response.url().path() == LOGIN {
            return Err(DasClientError::Login {
                usuario: usuario.to_string(),
            });
        }

        tracing::info!(usuario, "sessão aberta");
        Ok(())
    }

    /// Requisições já enviadas, opcionalmente só as de um contribuinte.
    pub async fn consultar_requisicoes(
        &self,
        contribuinte: Option<&str>,
    ) -> Result<Vec<Requisicao>, DasClientError> {
        let mut url = self.config.endpoint(CONSULTAR_REQUISICOES)?;
        if let Some(contribuinte) = contribuinte {
            url.query_pairs_mut().append_pair("contribuinte", contribuinte);
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| http_error(CONSULTAR_REQUISICOES, e))?;
        let bytes = corpo_2xx(CONSULTAR_REQUISICOES, response).await?;
        serde_json::from_slice(&bytes).map_err(|e| DasClientError::Deserialization {
            endpoint: CONSULTAR_REQUISICOES.into(),
            source: e,
        })
    }

    /// PDF da guia de uma requisição.
    pub async fn baixar_recibo(&self, id: u64) -> Result<Recibo, DasClientError> {
        let url = self.config.endpoint(&format!("{BAIXAR_RECIBO}/{id}"))?;
        self.baixar(BAIXAR_RECIBO, url, format!("recibo_{id}.pdf")).await
    }

    /// ZIP com todas as guias disponíveis.
    pub async fn baixar_todos_recibos(&self) -> Result<Recibo, DasClientError> {
        let url = self.config.endpoint(BAIXAR_TODOS_RECIBOS)?;
        self.baixar(BAIXAR_TODOS_RECIBOS, url, "recibos_em_lote.zip".to_string())
            .await
    }

    async fn baixar(
        &self,
        endpoint: &str,
        url: url::Url,
        nome_padrao: String,
    ) -> Result<Recibo, DasClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        let nome = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(nome_do_anexo)
            .unwrap_or(nome_padrao);
        let conteudo = corpo_2xx(endpoint, response).await?;

        Ok(Recibo { nome, conteudo })
    }

    /// Envia um pedido de emissão individual.
    pub async fn gerar_das(
        &self,
        form: &GerarDasForm,
    ) -> Result<RespostaGerarDas, DasClientError> {
        let url = self.config.endpoint(GERAR_DAS)?;
        tracing::debug!(%url, id_sistema = %form.id_sistema, "enviando pedido de DAS");

        let response = self
            .http
            .post(url)
            .multipart(form.to_multipart())
            .send()
            .await
            .map_err(|e| http_error(GERAR_DAS, e))?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| http_error(GERAR_DAS, e))?;
        let corpo = serde_json::from_slice(&bytes).map_err(|e| DasClientError::Deserialization {
            endpoint: GERAR_DAS.into(),
            source: e,
        })?;

        Ok(RespostaGerarDas { status, corpo })
    }

    /// Envia a planilha do lote. Status fora de 2xx vira erro antes de ler o corpo.
    pub async fn enviar_em_lote(
        &self,
        arquivo: Option<&ArquivoLote>,
    ) -> Result<RespostaLote, DasClientError> {
        let url = self.config.endpoint(ENVIAR_EM_LOTE)?;
        tracing::debug!(%url, arquivo = ?arquivo.map(|a| &a.nome), "enviando lote");

        let mut form = Form::new();
        if let Some(arquivo) = arquivo {
            form = form.part(CAMPO_ARQUIVO, arquivo.to_part());
        }

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| http_error(ENVIAR_EM_LOTE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DasClientError::Status {
                endpoint: ENVIAR_EM_LOTE.into(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| http_error(ENVIAR_EM_LOTE, e))?;
        serde_json::from_slice(&bytes).map_err(|e| DasClientError::Deserialization {
            endpoint: ENVIAR_EM_LOTE.into(),
            source: e,
        })
    }
}

async fn corpo_2xx(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<Vec<u8>, DasClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(DasClientError::Status {
            endpoint: endpoint.into(),
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await.map_err(|e| http_error(endpoint, e))?;
    Ok(bytes.to_vec())
}

fn http_error(endpoint: &str, source: reqwest::Error) -> DasClientError {
    DasClientError::Http {
        endpoint: endpoint.into(),
        source,
    }
}
