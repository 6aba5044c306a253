//! Server-side rendering of the mint page.

use cryptodevs_types::{Action, Phase, PresentationState, UiMode};

/// Route each action button posts to.
pub fn action_path(action: Action) -> &'static str {
    match action {
        Action::Connect => "/connect",
        Action::StartPresale => "/start-presale",
        Action::PresaleMint => "/presale-mint",
        Action::PublicMint => "/mint",
    }
}

pub fn button_label(action: Action) -> &'static str {
    match action {
        Action::Connect => "Connect your wallet",
        Action::StartPresale => "Start Presale!",
        Action::PresaleMint => "Presale Mint 🚀",
        Action::PublicMint => "Public Mint 🚀",
    }
}

/// The mode-specific control block.
fn render_control(mode: UiMode) -> String {
    match mode {
        UiMode::Loading => r#"<button class="button" disabled>Loading...</button>"#.to_string(),
        UiMode::Connected(Phase::PresaleNotStarted { can_start: false }) => {
            r#"<div class="description">Presale hasn't started!</div>"#.to_string()
        }
        UiMode::Connected(Phase::PresaleActive) => format!(
            "<div class=\"description\">Presale has started! If your address is whitelisted, Mint a Crypto Dev 🥳</div>\n{}",
            render_button(Action::PresaleMint)
        ),
        other => other
            .actions()
            .iter()
            .map(|a| render_button(*a))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_button(action: Action) -> String {
    format!(
        r#"<form method="post" action="{}"><button class="button" type="submit">{}</button></form>"#,
        action_path(action),
        button_label(action)
    )
}

/// Full HTML page for the current state. The collection preview is token 0
/// from `image_base_url`.
pub fn render_page(state: &PresentationState, max_supply: u64, image_base_url: &str) -> String {
    let notice = state
        .notice
        .as_deref()
        .map(|n| format!("<div class=\"notice\" role=\"alert\">{}</div>\n", escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>Crypto Devs</title>
<meta name="description" content="Whitelist-Dapp">
<meta http-equiv="refresh" content="5">
</head>
<body>
<div class="main">
<div>
<h1 class="title">Welcome to Crypto Devs!</h1>
<div class="description">It's an NFT collection for developers in Crypto.</div>
<div class="description">{minted}/{max_supply} have been minted</div>
{notice}{control}
</div>
<div><img class="image" src="{image}0.svg" alt=""></div>
</div>
<footer class="footer">Made with &#10084; by Crypto Devs</footer>
</body>
</html>
"#,
        minted = state.minted_count,
        control = render_control(state.mode()),
        image = escape_html(image_base_url),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
