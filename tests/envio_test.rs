//! Fluxo de envio individual contra um `/gerar_das` simulado.

mod common;

use das_util_lib::client::GerarDasForm;
use das_util_lib::feedback::{BannerStyle, DAS_GERADO, ERRO_ENVIO_GENERICO};
use das_util_lib::{SingleSubmitController, SubmissionState};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_at, client_for, SEM_SERVIDOR};

fn preencher(controller: &mut SingleSubmitController) {
    controller.view.preencher_contribuinte("12345678000190", "2");
    controller.view.selecionar_sistema("PARCSN");
    controller.view.digitar_parcela("202405");
}

#[tokio::test]
async fn status_200_mostra_sucesso_e_limpa_o_formulario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .and(body_string_contains("GERARDAS161"))
        .and(body_string_contains("parcela_para_emitir"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Documento DAS gerado com sucesso!",
            "dados": {"id_requisicao": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    preencher(&mut controller);

    let estado = controller.submit().await;
    assert_eq!(estado, SubmissionState::Succeeded);
    assert!(controller.view.sucesso.visivel);
    assert_eq!(controller.view.sucesso.texto, DAS_GERADO);
    assert!(!controller.view.erro.visivel);
    assert_eq!(controller.view.form(), &GerarDasForm::default());
}

#[tokio::test]
async fn status_400_mostra_a_mensagem_do_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"mensagem": "CNPJ invalido"})),
        )
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    preencher(&mut controller);

    let estado = controller.submit().await;
    assert_eq!(estado, SubmissionState::Failed);
    assert!(controller.view.erro.visivel);
    assert_eq!(controller.view.erro.estilo, BannerStyle::Danger);
    assert!(controller.view.erro.texto.contains("CNPJ invalido"));
    assert!(!controller.view.sucesso.visivel);
    assert_eq!(controller.view.form().contribuinte, "12345678000190");
}

#[tokio::test]
async fn segundo_erro_substitui_o_primeiro() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"mensagem": "CNPJ invalido"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "Erro ao processar o pedido"})),
        )
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    preencher(&mut controller);

    controller.submit().await;
    assert!(controller.view.erro.texto.contains("CNPJ invalido"));

    controller.submit().await;
    assert!(controller.view.erro.visivel);
    assert_eq!(controller.view.erro.texto, "Erro ao enviar: Erro ao processar o pedido");
}

#[tokio::test]
async fn erro_sem_mensagem_usa_o_texto_generico() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    controller.submit().await;
    assert_eq!(controller.view.erro.texto, ERRO_ENVIO_GENERICO);
}

#[tokio::test]
async fn corpo_ilegivel_e_tratado_como_falha_mesmo_com_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    preencher(&mut controller);

    assert_eq!(controller.submit().await, SubmissionState::Failed);
    assert_eq!(controller.view.erro.texto, ERRO_ENVIO_GENERICO);
    assert!(!controller.view.sucesso.visivel);
}

#[tokio::test]
async fn falha_de_rede_mostra_o_texto_generico() {
    let mut controller = SingleSubmitController::new(client_at(SEM_SERVIDOR));
    preencher(&mut controller);

    assert_eq!(controller.submit().await, SubmissionState::Failed);
    assert!(controller.view.erro.visivel);
    assert_eq!(controller.view.erro.texto, ERRO_ENVIO_GENERICO);
}

#[tokio::test]
async fn novo_envio_esconde_o_sucesso_anterior() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gerar_das"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"mensagem": "falhou"})))
        .mount(&server)
        .await;

    let mut controller = SingleSubmitController::new(client_for(&server));
    preencher(&mut controller);
    controller.submit().await;
    assert!(controller.view.sucesso.visivel);

    controller.submit().await;
    assert!(!controller.view.sucesso.visivel);
    assert!(controller.view.erro.visivel);
}
