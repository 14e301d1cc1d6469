use dashboard_core::{ExportFormat, Msg, SortField, SortOrder};

pub const HELP: &str = "\
Commands:
  r | refresh            reload the current query
  n | next, p | prev     move between pages
  page <n>               jump to page n
  sub [name]             filter by subreddit (no name clears)
  cat [name]             filter by category (no name clears)
  sort <field>           opportunity_score | score | severity | num_comments | created_utc
  order asc|desc         sort direction
  search [text]          search titles and bodies (no text clears)
  show <id>              open the detail view for a pain point
  close                  close the detail view
  scrape                 start a scrape job
  export csv|json        print the export download link
  h | help               this text
  q | quit               exit";

/// One line of user input, decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" => return Command::Dispatch(Vec::new()),
        "h" | "help" | "?" => return Command::Help,
        "q" | "quit" | "exit" => return Command::Quit,
        "r" | "refresh" => Msg::RefreshRequested,
        "n" | "next" => Msg::NextPage,
        "p" | "prev" => Msg::PreviousPage,
        "page" => match rest.parse() {
            Ok(page) => Msg::PageRequested(page),
            Err(_) => return Command::Invalid(format!("not a page number: {rest:?}")),
        },
        "sub" => Msg::SubredditSelected(rest.to_string()),
        "cat" => Msg::CategorySelected(rest.to_string()),
        "sort" => match SortField::parse(rest) {
            Some(field) => Msg::SortSelected(field),
            None => return Command::Invalid(format!("unknown sort field: {rest:?}")),
        },
        "order" => match rest.to_ascii_lowercase().as_str() {
            "asc" => Msg::OrderSelected(SortOrder::Asc),
            "desc" => Msg::OrderSelected(SortOrder::Desc),
            _ => return Command::Invalid(format!("order must be asc or desc, got {rest:?}")),
        },
        "search" => {
            return Command::Dispatch(vec![
                Msg::SearchInputChanged(rest.to_string()),
                Msg::SearchSubmitted,
            ])
        }
        "show" if !rest.is_empty() => Msg::PainPointSelected {
            id: rest.to_string(),
        },
        "close" => Msg::DetailClosed,
        "scrape" => Msg::ScrapeClicked,
        "export" => match rest.to_ascii_lowercase().as_str() {
            "csv" => Msg::ExportRequested(ExportFormat::Csv),
            "json" => Msg::ExportRequested(ExportFormat::Json),
            _ => return Command::Invalid(format!("export format must be csv or json, got {rest:?}")),
        },
        _ => return Command::Invalid(format!("unknown command: {line:?}")),
    };
    Command::Dispatch(vec![msg])
}
