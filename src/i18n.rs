//! Localized bot messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages the bot can talk in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ru, Language::En];

    /// Two-letter code, also used as the translation key in the city catalog
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    /// Label shown on the language picker button
    pub fn button_label(self) -> &'static str {
        match self {
            Language::En => "🇬🇧 English",
            Language::Ru => "🇷🇺 Русский",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Greeting sent on `/start`, before a language is known
pub const GREETING: &str = "✈️ Welcome / Добро пожаловать";

/// Static message table for one language
#[derive(Debug)]
pub struct Messages {
    pub ask_route: &'static str,
    pub invalid_format: &'static str,
    pub no_ticket: &'static str,
    pub thank_you: &'static str,
    pub your_ticket: &'static str,
    pub help: &'static str,
    pub catalog_unavailable: &'static str,
    pub no_flights: &'static str,
    pub selection_expired: &'static str,
    pub click_to_buy: &'static str,
    pub available_via: &'static str,
    pub internal_error: &'static str,
}

static EN: Messages = Messages {
    ask_route: "Please send your route and date like this:\n`Yekaterinburg - Dushanbe 20.08.2025`",
    invalid_format: "❌ Invalid format. Please use:\n`City1 - City2 DD.MM.YYYY`",
    no_ticket: "You don’t have any tickets yet.",
    thank_you: "✅ Thank you for your purchase!",
    your_ticket: "🎫 Your ticket:\n",
    help: "Send your route like: *Moscow - Dubai 25.08.2025*\nUse /myticket to see your ticket.",
    catalog_unavailable: "⚠️ Flight information is temporarily unavailable. Please try again later.",
    no_flights: "No flights found for this route. Try another date or city.",
    selection_expired: "⌛ This selection has expired or is invalid. Please search again.",
    click_to_buy: "Click here to buy",
    available_via: "Available via:",
    internal_error: "⚠️ Something went wrong. Please try again.",
};

static RU: Messages = Messages {
    ask_route: "Пожалуйста, отправьте маршрут и дату в формате:\n`Екатеринбург - Душанбе 20.08.2025`",
    invalid_format: "❌ Неверный формат. Используйте:\n`Город1 - Город2 ДД.ММ.ГГГГ`",
    no_ticket: "У вас пока нет билетов.",
    thank_you: "✅ Спасибо за покупку!",
    your_ticket: "🎫 Ваш билет:\n",
    help: "Отправьте маршрут, например: *Москва - Дубай 25.08.2025*\nИспользуйте /myticket, чтобы увидеть билет.",
    catalog_unavailable: "⚠️ Информация о рейсах временно недоступна. Попробуйте позже.",
    no_flights: "Рейсы по этому маршруту не найдены. Попробуйте другую дату или город.",
    selection_expired: "⌛ Этот выбор устарел или недействителен. Выполните поиск заново.",
    click_to_buy: "Нажмите, чтобы купить",
    available_via: "Доступно через:",
    internal_error: "⚠️ Что-то пошло не так. Попробуйте ещё раз.",
};

pub fn messages(language: Language) -> &'static Messages {
    match language {
        Language::En => &EN,
        Language::Ru => &RU,
    }
}

/// A command shown in the transport's command menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    pub command: &'static str,
    pub description: &'static str,
}

pub const COMMAND_MENU: [CommandInfo; 3] = [
    CommandInfo {
        command: "start",
        description: "Start the bot / Запустить бота",
    },
    CommandInfo {
        command: "myticket",
        description: "Show your ticket / Показать билет",
    },
    CommandInfo {
        command: "help",
        description: "Help and info / Помощь и информация",
    },
];
