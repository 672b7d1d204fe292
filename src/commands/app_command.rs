use crate::app_service::LoadTicket;
use crate::view::ViewMode;
use std::str::FromStr;

pub const HELP_TEXT: &str = "commandes: sort <clé> | region <nom>|all | dept <nom> | dept clear | page <n> | mode producers|commerces | search <texte> | clear | reload | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Sort(String),
    /// `None` 表示全部地区
    Region(Option<String>),
    DeptToggle(String),
    DeptClear,
    Page(usize),
    Mode(ViewMode),
    Search(String),
    Clear,
    Reload,
    /// 内部命令：后台按该批次号拉取目录
    Load {
        ticket: LoadTicket,
    },
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }
        // 地区/省份名可能含空格，参数整体拼回去
        let rest = parts[1..].join(" ");

        match parts[0] {
            "sort" | "tri" => {
                if rest.is_empty() {
                    Ok(AppCommand::Unknown("usage: sort <clé>".to_string()))
                } else {
                    Ok(AppCommand::Sort(rest))
                }
            }
            "region" | "région" => match rest.as_str() {
                "" => Ok(AppCommand::Unknown("usage: region <nom>|all".to_string())),
                "all" | "toutes" | "*" => Ok(AppCommand::Region(None)),
                _ => Ok(AppCommand::Region(Some(rest))),
            },
            "dept" | "departement" | "département" => match rest.as_str() {
                "" => Ok(AppCommand::Unknown("usage: dept <nom> | dept clear".to_string())),
                "clear" => Ok(AppCommand::DeptClear),
                _ => Ok(AppCommand::DeptToggle(rest)),
            },
            "page" => match rest.parse::<usize>() {
                Ok(n) => Ok(AppCommand::Page(n)),
                Err(_) => Ok(AppCommand::Unknown("usage: page <n>".to_string())),
            },
            "mode" => match rest.parse::<ViewMode>() {
                Ok(mode) => Ok(AppCommand::Mode(mode)),
                Err(msg) => Ok(AppCommand::Unknown(msg)),
            },
            "search" | "recherche" => Ok(AppCommand::Search(rest)),
            "clear" => Ok(AppCommand::Clear),
            "reload" => Ok(AppCommand::Reload),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("commande inconnue: {}", parts[0]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppCommand {
        s.parse().unwrap()
    }

    #[test]
    fn multi_word_facet_names_are_kept_whole() {
        assert_eq!(
            parse("region Provence-Alpes-Côte d'Azur"),
            AppCommand::Region(Some("Provence-Alpes-Côte d'Azur".to_string()))
        );
        assert_eq!(
            parse("dept  Alpes de Haute Provence "),
            AppCommand::DeptToggle("Alpes de Haute Provence".to_string())
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(parse("region all"), AppCommand::Region(None));
        assert_eq!(parse("dept clear"), AppCommand::DeptClear);
        assert_eq!(parse("page 3"), AppCommand::Page(3));
        assert_eq!(parse("mode commerces"), AppCommand::Mode(ViewMode::Commerces));
        assert_eq!(parse("sort rating_desc"), AppCommand::Sort("rating_desc".to_string()));
        assert_eq!(parse("search"), AppCommand::Search(String::new()));
        assert_eq!(parse("q"), AppCommand::Quit);
    }

    #[test]
    fn bad_arguments_become_unknown() {
        assert!(matches!(parse("page deux"), AppCommand::Unknown(_)));
        assert!(matches!(parse("mode table"), AppCommand::Unknown(_)));
        assert!(matches!(parse("sort"), AppCommand::Unknown(_)));
        assert!(matches!(parse("frobnicate"), AppCommand::Unknown(_)));
    }
}
