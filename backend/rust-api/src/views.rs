//! Server-rendered pages for the browser quiz flow.

use std::fmt::Write as _;

use crate::models::{
    QuestionKind, QuizMode, QuizResult, QuizSession, TopicSummary, ARITHMETIC_TOPIC,
};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem;color:#222}\
h1{font-size:1.6rem}\
.card{border:1px solid #ddd;border-radius:8px;padding:1.25rem;margin:1rem 0}\
.prompt{font-size:2rem;font-weight:600;margin:.5rem 0 1rem}\
label.choice{display:block;padding:.5rem;border:1px solid #ccc;border-radius:6px;margin:.4rem 0}\
.ok{color:#1a7f37}.bad{color:#cf222e}\
nav{display:flex;gap:.75rem;margin-top:1rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #eee;padding:.4rem;text-align:left}\
button{padding:.5rem 1rem}";

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} · wlingo</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn home(topics: &[TopicSummary], default_count: usize) -> String {
    let mut options = String::new();
    for topic in topics.iter().filter(|topic| topic.count > 0) {
        let _ = write!(
            options,
            "<option value=\"{}\">{} ({} words)</option>",
            escape(&topic.id),
            escape(&topic.name),
            topic.count
        );
    }
    let _ = write!(
        options,
        "<option value=\"{}\">Arithmetic</option>",
        ARITHMETIC_TOPIC
    );

    let body = format!(
        "<h1>Choose a quiz</h1>\n\
         <form class=\"card\" method=\"post\" action=\"/start\">\n\
         <p><label>Topic <select name=\"topic\">{options}</select></label></p>\n\
         <p><label>Questions <input type=\"number\" name=\"count\" min=\"1\" value=\"{default_count}\"></label></p>\n\
         <button type=\"submit\">Start</button>\n\
         </form>\n\
         <p><a href=\"/docs\">API documentation</a></p>"
    );
    layout("Choose a quiz", &body)
}

pub fn question(session: &QuizSession, index: usize) -> String {
    let total = session.total_questions();
    let Some(question) = session.questions.get(index) else {
        return error_page("Question not found");
    };
    let record = session.answers.get(&index);

    let mut body = format!(
        "<h1>{topic}</h1>\n<p>Question {number} of {total} · Score {score}</p>\n\
         <div class=\"card\">\n<div class=\"prompt\">{prompt}</div>\n",
        topic = escape(&session.topic),
        number = index + 1,
        score = session.score,
        prompt = escape(&question.prompt),
    );

    if let Some(record) = record {
        let (class, verdict) = if record.is_correct {
            ("ok", "Correct!")
        } else {
            ("bad", "Incorrect")
        };
        let _ = write!(
            body,
            "<p class=\"{class}\">{verdict} You answered <strong>{}</strong>; \
             the answer is <strong>{}</strong>.</p>\n",
            escape(&record.submitted),
            escape(&record.correct_answer),
        );
    }

    if !session.is_completed() {
        let _ = write!(body, "<form method=\"post\" action=\"/quiz/{index}\">\n");
        // Arithmetic also accepts a typed answer, so its radios are optional.
        let required = match question.kind {
            QuestionKind::Vocabulary => " required",
            QuestionKind::Arithmetic => "",
        };
        if !question.choices.is_empty() {
            for (option, choice) in question.choices.iter().enumerate() {
                let _ = write!(
                    body,
                    "<label class=\"choice\"><input type=\"radio\" name=\"option\" value=\"{option}\"{required}> {}</label>\n",
                    escape(choice)
                );
            }
        }
        if question.kind == QuestionKind::Arithmetic {
            body.push_str(
                "<p><input type=\"text\" name=\"answer\" inputmode=\"numeric\" autocomplete=\"off\" autofocus></p>\n",
            );
        }
        body.push_str("<button type=\"submit\">Answer</button>\n</form>\n");
    }
    body.push_str("</div>\n<nav>\n");

    if index > 0 {
        let _ = write!(body, "<a href=\"/quiz/{}\">&larr; Previous</a>\n", index - 1);
    }
    if index + 1 < total {
        let _ = write!(body, "<a href=\"/quiz/{}\">Next &rarr;</a>\n", index + 1);
    }
    if session.is_completed() {
        body.push_str("<a href=\"/result\">Results</a>\n");
    } else {
        body.push_str(
            "<form method=\"post\" action=\"/finish\"><button type=\"submit\">Finish quiz</button></form>\n",
        );
    }
    body.push_str("</nav>");

    layout(&format!("Question {}", index + 1), &body)
}

pub fn result(session: &QuizSession, result: &QuizResult) -> String {
    let heading = match session.mode {
        QuizMode::Vocabulary => escape(&session.topic),
        QuizMode::Arithmetic => "Arithmetic".to_string(),
    };
    let mut rows = String::new();
    for record in &result.answers {
        let (class, mark) = if record.is_correct {
            ("ok", "✓")
        } else {
            ("bad", "✗")
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{class}\">{mark}</td></tr>\n",
            escape(&record.prompt),
            escape(&record.submitted),
            escape(&record.correct_answer),
        );
    }

    let body = format!(
        "<h1>Results: {heading}</h1>\n\
         <div class=\"card\"><p class=\"prompt\">{correct} / {total} ({percent}%)</p></div>\n\
         <table>\n<tr><th>Question</th><th>Your answer</th><th>Correct answer</th><th></th></tr>\n{rows}</table>\n\
         <nav><form method=\"post\" action=\"/reset\"><button type=\"submit\">New quiz</button></form></nav>",
        correct = result.correct_count,
        total = result.total_questions,
        percent = result.score_percentage,
    );
    layout("Results", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to start</a></p>",
        escape(message)
    );
    layout("Error", &body)
}

/// Swagger UI bootstrapped from a CDN, reading `/openapi.json`.
pub fn swagger_ui() -> String {
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
     <title>wlingo API docs</title>\n\
     <link rel=\"stylesheet\" href=\"https://unpkg.com/swagger-ui-dist@5/swagger-ui.css\">\n\
     </head>\n<body>\n<div id=\"swagger-ui\"></div>\n\
     <script src=\"https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js\"></script>\n\
     <script>window.ui = SwaggerUIBundle({ url: '/openapi.json', dom_id: '#swagger-ui' });</script>\n\
     </body>\n</html>\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use chrono::Utc;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_home_lists_non_empty_topics_and_arithmetic() {
        let topics = vec![
            TopicSummary {
                id: "spanish".into(),
                name: "Spanish".into(),
                count: 2,
            },
            TopicSummary {
                id: "empty".into(),
                name: "Empty".into(),
                count: 0,
            },
        ];
        let page = home(&topics, 15);
        assert!(page.contains("value=\"spanish\""));
        assert!(!page.contains("value=\"empty\""));
        assert!(page.contains(ARITHMETIC_TOPIC));
        assert!(page.contains("value=\"15\""));
    }

    #[test]
    fn test_question_page_escapes_and_shows_feedback() {
        let mut session = QuizSession::new(
            "s",
            "spanish",
            QuizMode::Vocabulary,
            vec![
                Question::vocabulary("<hola>", "hello")
                    .with_choices(vec!["hello".into(), "cat".into()]),
                Question::vocabulary("gato", "cat"),
            ],
            Utc::now(),
        );
        let page = question(&session, 0);
        assert!(page.contains("&lt;hola&gt;"));
        assert!(page.contains("name=\"option\" value=\"1\""));

        session.submit(0, "cat").unwrap();
        let page = question(&session, 0);
        assert!(page.contains("Incorrect"));
        assert!(page.contains("/quiz/1"));
    }

    #[test]
    fn test_single_choice_question_is_answerable() {
        let session = QuizSession::new(
            "s",
            "tiny",
            QuizMode::Vocabulary,
            vec![Question::vocabulary("uno", "one").with_choices(vec!["one".into()])],
            Utc::now(),
        );
        let page = question(&session, 0);
        assert!(page.contains("name=\"option\" value=\"0\" required"));
    }
}
