//! HTML pages: the signing form and the login redirect.

use crate::stage::{Stage, LOCAL_RETURN_URL};

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// URL the login service should send the user back to.
///
/// Anything served from localhost returns to the local dev domain instead,
/// since the login service will not redirect to localhost.
pub fn return_url(proto: &str, host: &str, path_and_query: &str) -> String {
    let url = format!("{}://{}{}", proto, host, path_and_query);
    if url.contains("localhost") {
        LOCAL_RETURN_URL.to_string()
    } else {
        url
    }
}

/// Login link for the stage's SSO domain.
pub fn login_url(stage: Stage, return_url: &str) -> String {
    format!(
        "{}/login?returnUrl={}",
        stage.login_domain(),
        urlencoding::encode(return_url)
    )
}

/// Page shown to users without a valid session.
pub fn login_page_html(login_url: &str) -> String {
    let login_url = html_escape(login_url);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Image URL Signing Service - Not logged in</title>
</head>
<body>
    <h1>Image URL Signing Service</h1>
    <p>You must be logged in to use the Image URL signing service.
        <a href="{login_url}">Click here to login</a>
    </p>
</body>
</html>
"#
    )
}

/// Signing form for logged-in users.
pub fn signing_form_html() -> &'static str {
    SIGNING_FORM_HTML
}

const SIGNING_FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image URL Signing Service - UI</title>
    <style>
        body {
            font-family: sans-serif;
        }
        input[type=text], input[type=number] {
            margin: 10px;
            width: calc(100% - 30px);
            font-size: 20px;
        }
        label {
            margin: 10px;
            width: 100%;
            font-size: 20px;
        }
        input[type=submit] {
            margin: 10px;
            font-size: 20px;
        }
        .error {
            color: #b00020;
        }
    </style>
</head>
<body>
    <h1>Image URL Signing Service - UI</h1>

    <p>You are logged in</p>

    <p>Paste a media.guim.co.uk image URL below, for example one copied from a
    crop in <a href="https://media.gutools.co.uk">the grid</a>, and choose the
    resize parameters. The result is a signed i.guim.co.uk URL that the image
    resizer will serve.</p>

    <p>Resizer URLs are signed so that nobody can ask the resizer for arbitrary
    variants of the same image. See
    <a href="https://docs.fastly.com/api/imageopto/">the image optimizer API reference</a>
    for what the resizer supports.</p>

    <form id="form">
        <label for="url">Image URL:</label><br>
        <input type="text" id="url" name="url" value=""><br><br>

        <label for="width">Width:</label><br>
        <input type="number" id="width" name="width" value="400"><br><br>

        <label for="height">Height:</label><br>
        <input type="number" id="height" name="height"><br><br>

        <label for="quality">Quality (value between 0 and 100):</label><br>
        <input type="number" id="quality" name="quality" value="75"><br><br>

        <input type="submit" value="Submit">
    </form>
    <p id="result-error" class="error"></p>
    <input id="result-text" type="text" readonly>
    <img src="" id="result-img" alt="">
    <script>
        document.getElementById('form').addEventListener('submit', function (event) {
            event.preventDefault();
            const formData = new FormData(event.target);
            const body = { url: formData.get('url'), profile: {} };
            for (const key of ['width', 'height', 'quality']) {
                if (formData.get(key)) {
                    body.profile[key] = formData.get(key);
                }
            }
            fetch('/signed-image-url', {
                method: 'POST',
                body: JSON.stringify(body),
                credentials: 'include',
                headers: { 'Content-Type': 'application/json' },
            })
                .then((res) => res.json())
                .then((resBody) => {
                    const errorEl = document.getElementById('result-error');
                    if (resBody.error) {
                        errorEl.textContent = resBody.error;
                        return;
                    }
                    errorEl.textContent = '';
                    document.getElementById('result-img').src = resBody.signedUrl;
                    document.getElementById('result-text').value = resBody.signedUrl;
                });
        });
    </script>
</body>
</html>
"#;
