use std::sync::Arc;

use movieai::{
    models::TrendingWindow,
    services::{
        providers::SupabaseAuth, Catalog, Highlights, MovieEvents, MovieForm, MovieFormFlow,
        MovieListFlow, SearchFlow, SessionBridge, UserMovies,
    },
    telemetry,
    views::{pages, AuthStatusView, Route},
    Config, Feature,
};
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Type to search. Commands: :add title|year|photo|description, :refresh, :signin, :callback <url>, :signout, :quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.log_filter);

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let catalog = Catalog::from_config(&config);

    match Route::parse(&path) {
        Route::Landing => {
            let highlights = Highlights::load(&catalog, TrendingWindow::Week).await;
            print!("{}", pages::render_landing(&highlights, &config.tmdb_image_url));
        }
        Route::App => run_app(&config, catalog).await?,
        Route::NotFound => anyhow::bail!("No page at {}", path),
    }

    Ok(())
}

fn parse_form(fields: &str) -> MovieForm {
    let mut parts = fields.splitn(4, '|').map(|p| p.to_string());
    MovieForm {
        title: parts.next().unwrap_or_default(),
        year: parts.next().unwrap_or_default(),
        photo: parts.next().unwrap_or_default(),
        description: parts.next().unwrap_or_default(),
    }
}

async fn run_app(config: &Config, catalog: Catalog) -> anyhow::Result<()> {
    let image_base = config.tmdb_image_url.clone();

    let auth = config
        .persistence_credentials()
        .map(|(url, key)| Arc::new(SupabaseAuth::new(url.to_string(), key.to_string())));
    let session = auth
        .clone()
        .map(|auth| SessionBridge::start(auth, config.site_url.clone()));

    match &session {
        Some(bridge) => {
            let mut rx = bridge.subscribe();
            tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    let view = AuthStatusView::from(&*rx.borrow_and_update());
                    println!("[auth] {}", view);
                }
            });
        }
        None => println!("{}", Feature::Identity.notice()),
    }

    let store = UserMovies::from_config(config, session.as_ref().map(SessionBridge::subscribe));
    let events = MovieEvents::new();
    let mut form = MovieFormFlow::new(store.clone(), events.clone());
    let list = MovieListFlow::new(store);
    let _listener = list.watch_changes(&events);

    let mut list_rx = list.subscribe();
    tokio::spawn(async move {
        while list_rx.changed().await.is_ok() {
            let state = list_rx.borrow_and_update().clone();
            if !state.loading {
                print!("[saved]\n{}", pages::render_movie_list(&state));
            }
        }
    });
    list.refresh().await;
    if let Some(notice) = list.state().disabled {
        println!("{}", notice);
    }

    let search = SearchFlow::spawn(catalog, config.search_debounce());
    let mut search_rx = search.subscribe();
    tokio::spawn(async move {
        let mut shown = None;
        while search_rx.changed().await.is_ok() {
            let state = search_rx.borrow_and_update().clone();
            let key = (state.debounced.clone(), state.loading, state.results.len(), state.error.clone());
            if shown.as_ref() != Some(&key) {
                print!("{}", pages::render_search(&state, &image_base));
                shown = Some(key);
            }
        }
    });
    if let Some(notice) = search.state().disabled {
        println!("{}", notice);
    }

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let (command, rest) = line
            .split_once(' ')
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line.as_str(), ""));

        match command {
            ":quit" => break,
            ":refresh" => list.refresh().await,
            ":add" => {
                form.form = parse_form(rest);
                // Outcome is reported through the form status below.
                let _ = form.submit().await;
                print!("{}", pages::render_form_status(&form));
            }
            ":signin" => match &session {
                Some(bridge) => match bridge.sign_in_with_google().await {
                    Ok(url) => println!("Open this URL to sign in:\n{}", url),
                    Err(e) => println!("! {}", e.user_message("Unable to start sign-in.")),
                },
                None => println!("{}", Feature::Identity.notice()),
            },
            ":callback" => match (&auth, Url::parse(rest)) {
                (Some(auth), Ok(url)) => {
                    if let Err(e) = auth.complete_redirect(&url).await {
                        println!("! {}", e.user_message("Unable to complete sign-in."));
                    }
                }
                (Some(_), Err(e)) => println!("! Invalid callback URL: {}", e),
                (None, _) => println!("{}", Feature::Identity.notice()),
            },
            ":signout" => match &session {
                Some(bridge) => {
                    if let Err(e) = bridge.sign_out().await {
                        println!("! {}", e.user_message("Unable to sign out."));
                    }
                }
                None => println!("{}", Feature::Identity.notice()),
            },
            _ => search.set_query(line.clone()),
        }
    }

    Ok(())
}
