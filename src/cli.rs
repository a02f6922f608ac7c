// ── Linha de Comando ────────────────────────────────────────────
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use url::Url;

use crate::client::{ArquivoLote, DasClient};
use crate::config::{Credenciais, DasConfig};
use crate::envio::SingleSubmitController;
use crate::error::DasClientError;
use crate::feedback::SubmissionState;
use crate::historico::Recibo;
use crate::lote::BatchSubmitController;
use crate::parcela::parcela_atual;
use crate::sistema;

/// Emissão de DAS de parcelamento, individual ou em lote.
#[derive(Parser, Debug)]
#[command(name = "das-util", version, about, long_about = None)]
struct Cli {
    /// Mais detalhes no log. Repita para aumentar (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Origem do backend (sobrescreve DAS_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// Timeout por requisição, em segundos (sobrescreve DAS_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Usuário do backend (sobrescreve DAS_USUARIO).
    #[arg(long, global = true, requires = "senha")]
    usuario: Option<String>,

    /// Senha do backend (sobrescreve DAS_SENHA).
    #[arg(long, global = true, requires = "usuario")]
    senha: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Gera o DAS de um contribuinte.
    Gerar {
        /// CNPJ ou CPF do contribuinte.
        #[arg(long)]
        contribuinte: String,
        /// Tipo do contribuinte (1 = CPF, 2 = CNPJ).
        #[arg(long, default_value = "2")]
        tipo: String,
        /// Sistema de parcelamento (PARCSN, PERTMEI, ...).
        #[arg(long)]
        sistema: String,
        /// Parcela no formato AAAAMM. Padrão: mês corrente.
        #[arg(long)]
        parcela: Option<String>,
    },
    /// Envia uma planilha para geração em lote.
    Lote { arquivo: PathBuf },
    /// Mostra o serviço correspondente a um sistema.
    Servico { sistema: String },
    /// Lista as requisições já enviadas.
    Consultar {
        /// Filtra por CNPJ ou CPF.
        #[arg(long)]
        contribuinte: Option<String>,
    },
    /// Baixa a guia em PDF de uma requisição.
    Recibo {
        id: u64,
        /// Pasta onde salvar.
        #[arg(long, default_value = ".")]
        destino: PathBuf,
    },
    /// Baixa um ZIP com todas as guias disponíveis.
    Recibos {
        #[arg(long, default_value = ".")]
        destino: PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Servico { sistema: id } = &cli.command {
        println!("{}", sistema::ao_mudar_sistema(id));
        return ExitCode::SUCCESS;
    }

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("falha ao iniciar o runtime: {e}");
            return ExitCode::from(2);
        }
    };

    runtime.block_on(async move {
        if let Some(credenciais) = &client.config().credenciais {
            if let Err(e) = client.login(&credenciais.usuario, &credenciais.senha).await {
                tracing::error!("{e}");
                return ExitCode::from(2);
            }
        }

        match cli.command {
            Commands::Gerar {
                contribuinte,
                tipo,
                sistema,
                parcela,
            } => {
                let mut controller = SingleSubmitController::new(client);
                controller.view.preencher_contribuinte(&contribuinte, &tipo);
                controller.view.selecionar_sistema(&sistema);
                controller.view.digitar_parcela(&parcela.unwrap_or_else(parcela_atual));

                let estado = controller.submit().await;
                for banner in [&controller.view.sucesso, &controller.view.erro] {
                    if banner.visivel {
                        println!("{banner}");
                    }
                }
                codigo_de_saida(estado)
            }
            Commands::Lote { arquivo } => {
                let mut controller = BatchSubmitController::new(client);
                match ArquivoLote::from_path(&arquivo).await {
                    Ok(lote) => controller.view.arquivo = Some(lote),
                    Err(e) => tracing::warn!("{e}"),
                }

                let estado = controller.submit().await;
                println!("{}", controller.view.banner);
                if controller.view.detalhe.visivel {
                    print!("{}", controller.view.detalhe);
                }
                codigo_de_saida(estado)
            }
            Commands::Consultar { contribuinte } => {
                match client.consultar_requisicoes(contribuinte.as_deref()).await {
                    Ok(requisicoes) => {
                        for requisicao in &requisicoes {
                            println!("{requisicao}");
                        }
                        println!("Total de guias: {}", requisicoes.len());
                        ExitCode::SUCCESS
                    }
                    Err(e) => falha(e),
                }
            }
            Commands::Recibo { id, destino } => {
                salvar(client.baixar_recibo(id).await, &destino).await
            }
            Commands::Recibos { destino } => {
                salvar(client.baixar_todos_recibos().await, &destino).await
            }
            Commands::Servico { .. } => ExitCode::SUCCESS,
        }
    })
}

fn build_client(cli: &Cli) -> Result<DasClient, DasClientError> {
    let mut config = DasConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if cli.timeout.is_some() {
        config.timeout_secs = cli.timeout;
    }
    if let (Some(usuario), Some(senha)) = (&cli.usuario, &cli.senha) {
        config.credenciais = Some(Credenciais::new(usuario.as_str(), senha.as_str()));
    }
    DasClient::new(config)
}

async fn salvar(recibo: Result<Recibo, DasClientError>, destino: &Path) -> ExitCode {
    let recibo = match recibo {
        Ok(recibo) => recibo,
        Err(e) => return falha(e),
    };

    let caminho = destino.join(&recibo.nome);
    match tokio::fs::write(&caminho, &recibo.conteudo).await {
        Ok(()) => {
            println!("{}", caminho.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("falha ao salvar '{}': {e}", caminho.display());
            ExitCode::FAILURE
        }
    }
}

fn falha(e: DasClientError) -> ExitCode {
    tracing::error!("{e}");
    ExitCode::FAILURE
}

fn codigo_de_saida(estado: SubmissionState) -> ExitCode {
    match estado {
        SubmissionState::Succeeded => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info"),
        2 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definicao_da_cli_e_valida() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gerar_usa_tipo_2_por_padrao() {
        let cli = Cli::try_parse_from([
            "das-util",
            "gerar",
            "--contribuinte",
            "12345678000190",
            "--sistema",
            "PARCSN",
        ])
        .unwrap();
        match cli.command {
            Commands::Gerar { tipo, parcela, .. } => {
                assert_eq!(tipo, "2");
                assert!(parcela.is_none());
            }
            other => panic!("subcomando inesperado: {other:?}"),
        }
    }

    #[test]
    fn base_url_invalida_e_rejeitada() {
        let cli = Cli::try_parse_from(["das-util", "--base-url", "nada", "servico", "PARCSN"]);
        assert!(cli.is_err());
    }

    #[test]
    fn usuario_exige_senha() {
        let sem_senha = Cli::try_parse_from(["das-util", "--usuario", "admin", "consultar"]);
        assert!(sem_senha.is_err());

        let cli = Cli::try_parse_from([
            "das-util",
            "--usuario",
            "admin",
            "--senha",
            "admin123",
            "recibo",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.usuario.as_deref(), Some("admin"));
        assert!(matches!(cli.command, Commands::Recibo { id: 7, .. }));
    }
}
