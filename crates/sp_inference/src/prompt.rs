use sp_core::Language;

/// Builds the report prompt for the aggregated page texts.
///
/// The model is asked for exactly five `### N. Title` sections whose titles
/// match [`Language::section_titles`], so the sectioner can pick them up.
pub fn build_prompt(language: Language, keyword: &str, corpus: &str) -> String {
    let [common, unique, keywords, structure, faq] = language.section_titles();
    match language {
        Language::Pl => format!(
            r#"Jesteś światowej klasy analitykiem SEO i strategiem content marketingu. Twoim zadaniem jest przeanalizowanie dostarczonej treści z czołowych artykułów dla frazy "{keyword}" i na tej podstawie wygenerowanie kompleksowego raportu w formacie Markdown.

Twoja odpowiedź MUSI być podzielona na DOKŁADNIE 5 sekcji, używając nagłówków w formacie `### [Numer]. [Nazwa Sekcji]`. Nie używaj żadnych innych nagłówków H3 z numeracją.

### 1. {common}
Wypunktuj tematy, podtematy i kluczowe informacje, które powtarzają się w większości analizowanych tekstów. Skup się na tym, co jest standardem w TOP 10 i musi znaleźć się w nowym artykule.

### 2. {unique}
Wypunktuj nietypowe, oryginalne lub szczególnie wartościowe informacje (dane, przykłady, case studies, perspektywy), które pojawiły się tylko w niektórych źródłach.

### 3. {keywords}
Stwórz listę 10-15 najważniejszych słów kluczowych, fraz długoogonowych i pojęć semantycznie powiązanych, jako punkty listy pogrupowane tematycznie w formacie `- **Grupa:** fraza, fraza`. Określ intencję wyszukiwania dla frazy głównej.

### 4. {structure}
Stwórz ROZBUDOWANY i KOMPLETNY plan artykułu: jeden tytuł H1 (`# Tytuł`), krótki wstęp (2-3 zdania), co najmniej 4-5 sekcji H2 (`## Sekcja`), a dla każdej 2-4 podpunkty jako nagłówki H3 BEZ numeracji (`### Podpunkt`).

### 5. {faq}
Stwórz listę 4-5 najczęstszych pytań w stylu 'People Also Ask'. Pod każdym pytaniem podaj zwięzłą, 2-3 zdaniową odpowiedź opartą na przeanalizowanej treści.

Odpowiedz TYLKO treścią raportu, bez dodatkowych wstępów ani podsumowań. Cała odpowiedź musi być w języku polskim.
Treść do analizy:
{corpus}
"#
        ),
        Language::En => format!(
            r#"You are a world-class SEO analyst and content strategist. Analyse the content of the top-ranking articles for the phrase "{keyword}" provided below and produce a comprehensive report in Markdown.

Your answer MUST be split into EXACTLY 5 sections using headings of the form `### [Number]. [Section Name]`. Do not use any other numbered H3 headings.

### 1. {common}
List the topics, subtopics and key facts repeated across most of the analysed texts: the baseline every new article must cover.

### 2. {unique}
List unusual, original or especially valuable information (data, examples, case studies, perspectives) that appeared in only some of the sources.

### 3. {keywords}
List the 10-15 most important keywords, long-tail phrases and semantically related terms as bullet points grouped by theme, formatted `- **Group:** phrase, phrase`. State the search intent of the main phrase.

### 4. {structure}
Write a DETAILED and COMPLETE article outline: one H1 title (`# Title`), a short 2-3 sentence introduction, at least 4-5 H2 sections (`## Section`), and for each 2-4 subpoints as UN-numbered H3 headings (`### Subpoint`).

### 5. {faq}
List the 4-5 most common 'People Also Ask' style questions, each followed by a concise 2-3 sentence answer based on the analysed content.

Reply ONLY with the report, without any extra introduction or summary. The whole answer must be in English.
Content to analyse:
{corpus}
"#
        ),
    }
}
