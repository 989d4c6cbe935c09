use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use vark_results::quiz::dominant_styles;
use vark_results::{
    AppController, AppError, FileStorage, LogCollector, NoFederatedProvider, QuizInput,
    SettingsManager, SubmitError,
};

#[tokio::main]
async fn main() -> vark_results::Result<()> {
    let config = SettingsManager::load().unwrap_or_else(|e| {
        eprintln!("[Main] WARNING: settings unavailable, using defaults: {}", e);
        Default::default()
    });

    // =========================================================================
    // LOGGING INITIALIZATION - MUST BE FIRST
    // =========================================================================
    let log_collector = LogCollector::new(config.log_path(), None)
        .map_err(|e| format!("LogCollector initialization failed: {}", e))?
        .with_level(config.log_level());
    if let Err(e) = log_collector.install() {
        eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
    }
    log::info!("VARK Results {} logging initialized", vark_results::VERSION);

    // =========================================================================
    // CONTROLLER SETUP
    // =========================================================================
    let storage = Arc::new(FileStorage::new(config.storage_path()));
    let controller = AppController::new(config, storage, Arc::new(NoFederatedProvider));

    match controller.refresh().await {
        Some(identity) => println!(
            "Bem-vindo de volta, {}.",
            display(&identity.display_name, &identity.email)
        ),
        None => println!("Entre com `guest` ou `login <token>`."),
    }
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["guest"] => report_sign_in(controller.sign_in_guest().await),
            ["login", token] => report_sign_in(controller.sign_in_federated(token).await),
            ["whoami"] => match controller.identity() {
                Some(id) => {
                    let marker = if id.is_guest { " (visitante)" } else { "" };
                    println!("{} <{}>{}", id.display_name, id.email, marker);
                }
                None => println!("Nenhuma sessão ativa."),
            },
            ["submit", name @ .., a, b, c, d] if !name.is_empty() => {
                let input = QuizInput::new(name.join(" "), *a, *b, *c, *d);
                match controller.submit(input).await {
                    Ok(view) => print_result(&view),
                    Err(SubmitError::Persistence { source, .. }) => {
                        eprintln!("{}", AppError::from(source).user_message());
                        if let Some(view) = controller.current_result() {
                            print_result(&view);
                        }
                    }
                    Err(e) => eprintln!("{}", AppError::from(e).user_message()),
                }
            }
            ["history"] => print_history(&controller),
            ["document"] => println!("{}", controller.assessment_document()),
            ["logout"] => {
                if let Err(e) = controller.logout().await {
                    eprintln!("[Main] WARNING: cached session not removed: {}", e);
                }
                println!("Sessão encerrada.");
            }
            _ => println!("Comando desconhecido. Digite `help`."),
        }
    }

    log::info!("VARK Results shutting down");
    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Main] WARNING: Failed to wait for log collector to empty: {}", e);
    }
    Ok(())
}

fn display<'a>(name: &'a str, email: &'a str) -> &'a str {
    if name.is_empty() {
        email
    } else {
        name
    }
}

fn report_sign_in(result: Result<Option<vark_results::Identity>, AppError>) {
    match result {
        Ok(Some(identity)) => {
            println!("Olá, {}.", display(&identity.display_name, &identity.email))
        }
        Ok(None) => println!("Sessão não encontrada após o login."),
        Err(e) => eprintln!("{}", e.user_message()),
    }
}

fn print_result(view: &vark_results::ResultView) {
    let record = &view.record;
    println!("Perfil de {} ({})", record.name, record.timestamp);
    for entry in &view.breakdown {
        println!(
            "  {:<15} {:>2} pts  {:>5}%",
            entry.label,
            entry.value,
            record.percentages.get(entry.category)
        );
    }
    let dominant: Vec<&str> = dominant_styles(&record.scores)
        .iter()
        .map(|c| c.label())
        .collect();
    if !dominant.is_empty() {
        println!("  Predominante: {}", dominant.join(", "));
    }
}

fn print_history(controller: &AppController) {
    let history = controller.history();
    println!("Histórico de Resultados ({} registros)", history.len());
    if history.is_empty() {
        println!("  Nenhum resultado registrado ainda.");
    }
    for record in history {
        println!(
            "  {:<20} {:<20} V {:>5}%  A {:>5}%  R {:>5}%  K {:>5}%",
            record.name,
            record.timestamp,
            record.percentages.a,
            record.percentages.b,
            record.percentages.c,
            record.percentages.d
        );
    }
}

fn print_help() {
    println!("Comandos: guest | login <token> | submit <nome> <a> <b> <c> <d> | history | whoami | document | logout | quit");
}
