use skydeck::application_impl::{FixedCredentials, StoreSessionService};
use skydeck::application_port::{CredentialAuthenticator, SessionService, WeatherService};
use skydeck::domain_port::{KeyValueStore, SponsorRepo};
use skydeck::infra_http::OpenWeatherClient;
use skydeck::infra_store::{KvSponsorRepo, LocalStore};
use skydeck::logger::*;
use skydeck::settings::*;
use skydeck::sync::SyncNotifier;
use skydeck::view::{
    AdminView, LoginView, Nav, PublicSponsorView, Route, WeatherView, resolve_route,
};
use std::io::Write as _;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_filter(&project_settings.log.filter)?;

    let store = match cli
        .store
        .as_deref()
        .or(project_settings.store.path.as_deref())
    {
        Some(path) => LocalStore::open(path)?,
        None => LocalStore::in_memory(),
    };
    let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());

    let authenticator: Arc<dyn CredentialAuthenticator> = Arc::new(FixedCredentials {
        username: project_settings.admin.username.clone(),
        password: project_settings.admin.password.clone(),
    });
    let session_service: Arc<dyn SessionService> = Arc::new(
        StoreSessionService::new(tab.clone(), authenticator)
            .with_ttl_hours(project_settings.session.ttl_hours),
    );
    let sponsor_repo: Arc<dyn SponsorRepo> = Arc::new(KvSponsorRepo::new(tab.clone()));
    let notifier = SyncNotifier::new(tab.as_ref(), sponsor_repo.clone(), session_service.clone());

    let weather_service: Arc<dyn WeatherService> = Arc::new(OpenWeatherClient::new(
        project_settings.weather.base_url.clone(),
        project_settings.weather.api_key.clone(),
        project_settings.weather.units.clone(),
    ));

    let public_view = PublicSponsorView::mount(sponsor_repo.as_ref(), &notifier);
    let mut weather_view = WeatherView::new(weather_service);
    let mut admin_view: Option<AdminView> = None;

    println!("skydeck dashboard - type `help` for commands");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => print_help(),
            "open" => {
                let route = Route::parse(args.first().copied().unwrap_or("/"));
                match resolve_route(route, session_service.as_ref()) {
                    Route::Root => {
                        render_public(&public_view, &weather_view);
                        admin_view = None;
                    }
                    Route::Admin => match AdminView::mount(
                        session_service.clone(),
                        sponsor_repo.clone(),
                    ) {
                        Ok(view) => {
                            render_admin(&view);
                            admin_view = Some(view);
                        }
                        Err(_) => println!("session expired, please log in"),
                    },
                    Route::Login => println!("login required: `login <username> <password>`"),
                }
            }
            "weather" => {
                weather_view.city = args.join(" ");
                weather_view.lookup().await;
                render_weather(&weather_view);
            }
            "login" => {
                let (mut login_view, nav) = LoginView::mount(session_service.clone());
                if nav == Nav::Redirect(Route::Admin) {
                    println!("already logged in");
                    continue;
                }
                login_view.username = args.first().copied().unwrap_or_default().to_owned();
                login_view.password = args.get(1).copied().unwrap_or_default().to_owned();
                match login_view.submit() {
                    Nav::Redirect(Route::Admin) => {
                        println!("logged in - `open /admin` to manage sponsors");
                    }
                    _ => {
                        if let Some(error) = &login_view.error {
                            println!("{error}");
                        }
                    }
                }
            }
            "logout" => {
                if let Some(mut view) = admin_view.take() {
                    view.logout();
                } else if let Err(e) = session_service.logout() {
                    warn!("logout failed: {e}");
                }
                println!("logged out");
            }
            "add" | "edit" | "del" => {
                let Some(view) = admin_view.as_mut() else {
                    println!("open the admin view first: `open /admin`");
                    continue;
                };
                run_admin_command(view, command, &args);
            }
            "sponsors" => render_public(&public_view, &weather_view),
            "quit" | "exit" => break,
            other => println!("unknown command `{other}` - type `help`"),
        }
    }

    Ok(())
}

fn run_admin_command(view: &mut AdminView, command: &str, args: &[&str]) {
    match command {
        "add" => {
            let [name, logo, link] = args else {
                println!("usage: add <name> <logo-url> <link-url>");
                return;
            };
            view.form.name = (*name).to_owned();
            view.form.logo = (*logo).to_owned();
            view.form.link = (*link).to_owned();
            view.submit();
            report_admin(view);
        }
        "edit" => {
            let [index, name, logo, link] = args else {
                println!("usage: edit <index> <name> <logo-url> <link-url>");
                return;
            };
            let Ok(index) = index.parse::<usize>() else {
                println!("not an index: {index}");
                return;
            };
            view.begin_edit(index);
            if view.editing.is_none() {
                report_admin(view);
                return;
            }
            view.form.name = (*name).to_owned();
            view.form.logo = (*logo).to_owned();
            view.form.link = (*link).to_owned();
            view.submit();
            report_admin(view);
        }
        "del" => {
            let Some(Ok(index)) = args.first().map(|raw| raw.parse::<usize>()) else {
                println!("usage: del <index>");
                return;
            };
            view.delete(index);
            report_admin(view);
        }
        _ => unreachable!("dispatched above"),
    }
}

fn report_admin(view: &AdminView) {
    if let Some(notice) = &view.notice {
        println!("{notice}");
    }
    if let Some(error) = &view.error {
        println!("{error}");
    }
    render_admin(view);
}

fn render_admin(view: &AdminView) {
    println!("-- admin: {} sponsor(s) --", view.sponsors.len());
    for (index, sponsor) in view.sponsors.iter().enumerate() {
        let marker = if view.editing == Some(index) { "*" } else { " " };
        println!("{marker}[{index}] {} <{}> {}", sponsor.name, sponsor.link, sponsor.logo);
    }
}

fn render_public(view: &PublicSponsorView, weather: &WeatherView) {
    render_weather(weather);
    if view.is_hidden() {
        return;
    }
    println!("-- our sponsors --");
    for sponsor in view.sponsors() {
        println!("  {} - {}", sponsor.name, sponsor.link);
    }
}

fn render_weather(view: &WeatherView) {
    if let Some(report) = &view.report {
        println!(
            "{}, {}: {:.0}°C ({}), feels like {:.0}°C, humidity {}%, wind {:.0} m/s, {} hPa",
            report.city,
            report.country,
            report.temperature_c,
            report.description,
            report.feels_like_c,
            report.humidity_pct,
            report.wind_mps,
            report.pressure_hpa,
        );
    }
    if let Some(error) = &view.error {
        println!("{error}");
    }
}

fn print_help() {
    println!(
        r#"commands:
  open <path>                     navigate (/, /admin, /login)
  weather <city>                  look up current weather
  login <username> <password>     start an operator session
  logout                          end the session
  add <name> <logo> <link>        add a sponsor (admin view)
  edit <i> <name> <logo> <link>   update sponsor at index (admin view)
  del <i>                         delete sponsor at index (admin view)
  sponsors                        show the public dashboard
  quit"#
    );
}
