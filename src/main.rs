use api::{App, ChatGenerator, Embedder, HashingEmbedder, Pipeline, RemoteEmbedder};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the real environment still applies.
    dotenv::dotenv().ok();
    env_logger::init();

    // Parse environment variables
    let port: u16 = env::var("PORT")?.parse()?;
    let llm_url = env::var("LLM_URL")?.into_boxed_str();
    let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_owned()).into_boxed_str();
    let llm_key = env::var("LLM_API_KEY").ok().map(String::into_boxed_str);

    let http = reqwest_client()?;
    let embedder: Box<dyn Embedder> = match env::var("EMBED_URL") {
        Ok(url) => {
            let model = env::var("EMBED_MODEL").unwrap_or_else(|_| "text-embedding-3-small".to_owned());
            let key = env::var("EMBED_API_KEY").ok().map(String::into_boxed_str).or_else(|| llm_key.clone());
            log::info!("embedding with {model} at {url}");
            Box::new(RemoteEmbedder::new(http.clone(), url.into_boxed_str(), model.into_boxed_str(), key))
        }
        Err(_) => {
            log::warn!("EMBED_URL is not set; falling back to local hashed embeddings");
            Box::new(HashingEmbedder::default())
        }
    };
    log::info!("generating questions with {llm_model} at {llm_url}");
    let source = Box::new(ChatGenerator::new(http, llm_url, llm_model, llm_key));
    let app = App::from(Pipeline::new(embedder, source));

    let runtime = Runtime::new()?;
    runtime.block_on(serve(port, app))
}

fn reqwest_client() -> anyhow::Result<api::reqwest::Client> {
    Ok(api::reqwest::Client::builder().timeout(std::time::Duration::from_secs(120)).build()?)
}

async fn serve(port: u16, app: App) -> anyhow::Result<()> {
    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");

    let mut stop = core::pin::pin!(tokio::signal::ctrl_c());
    loop {
        let (stream, peer) = tokio::select! {
            biased;
            result = &mut stop => {
                result?;
                log::info!("shutting down");
                break;
            }
            accepted = listener.accept() => accepted?,
        };

        let app = app.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let app = app.clone();
                async move { Ok::<_, Infallible>(app.respond(req).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                log::error!("connection with {peer} failed: {err}");
            }
        });
    }

    Ok(())
}
