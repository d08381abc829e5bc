/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate flickr;

use anyhow::{Result, bail};
use dotenvy::dotenv;
use flickr::services::{Client, Creds, PhotoSource, SafetyLevel, UploadParams, UploadTicket};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 60;

// Oauth tokens stored in cache json file
#[derive(Deserialize, Debug)]
struct FlickrOauth1Token {
    token: String,
    secret: String,
}

// Retrieves the auth tokens.
fn get_flickr_tokens(path: PathBuf) -> Result<FlickrOauth1Token> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

// Polls every ticket until all of them settle or we give up
async fn wait_for_tickets(client: &Client, tickets: &mut [UploadTicket]) -> Result<()> {
    for _ in 0..MAX_POLLS {
        // A failed poll leaves the tickets as they were, so just try again next round
        if let Err(err) = client.poll_tickets(tickets).await {
            eprintln!("Ticket poll failed: {err}");
        }

        if tickets.iter().all(UploadTicket::is_terminal) {
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    bail!("Gave up waiting for {} ticket(s)", tickets.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let api_key = std::env::var("FLICKR_API_KEY")?;
    let api_secret = std::env::var("FLICKR_API_SECRET")?;
    let token_cache = std::env::var("FLICKR_AUTH_CACHE")?;
    let tokens = get_flickr_tokens(token_cache.into())?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: upload_photo <image> [<image>..]");
    }

    // The API key/secret is obtained from your Flickr account
    // The Access Token/Secret is obtained via the OAuth1 authentication process
    let client = Client::new(Creds::from_tokens(
        &api_key,
        &api_secret,
        &tokens.token,
        &tokens.secret,
    )?)?;

    let params = UploadParams {
        is_public: Some(false),
        safety_level: Some(SafetyLevel::Safe),
        ..Default::default()
    }
    .with_tag("uploaded with rust");

    let mut tickets = Vec::with_capacity(paths.len());
    for path in &paths {
        let ticket = client
            .upload_async(PhotoSource::from_path(path), &params)
            .await?;
        println!("{path}: ticket {}", ticket.ticket_id);
        tickets.push(ticket);
    }

    wait_for_tickets(&client, &mut tickets).await?;

    for (path, ticket) in paths.iter().zip(&tickets) {
        match ticket.outcome() {
            Ok(Some(photo_id)) => println!("{path}: photo {photo_id} ({})", ticket.status),
            Ok(None) => println!("{path}: {}", ticket.status),
            Err(err) => println!("{path}: {err}"),
        }
    }
    Ok(())
}
