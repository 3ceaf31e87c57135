/*!
 * Descriptors for the REST translation vendors.
 *
 * Each descriptor plugs into `engines::RestEngine`; the type aliases below
 * name the resulting engines.
 */

use crate::engines::RestEngine;

pub mod azure;
pub mod deepl;
pub mod google;
pub mod modernmt;
pub mod yandex;

pub use self::azure::Azure;
pub use self::deepl::DeepL;
pub use self::google::Google;
pub use self::modernmt::ModernMT;
pub use self::yandex::Yandex;

/// Azure Translator Text engine
pub type AzureTranslator = RestEngine<Azure>;
/// DeepL API engine
pub type DeepLTranslator = RestEngine<DeepL>;
/// Google Cloud Translation engine
pub type GoogleTranslator = RestEngine<Google>;
/// ModernMT engine
pub type ModernMTTranslator = RestEngine<ModernMT>;
/// Yandex Translate engine
pub type YandexTranslator = RestEngine<Yandex>;
