//! Бесконечная карусель подборки на главной.
//!
//! Слайды хранятся в «расширенной ленте» `[последний, слайды.., первый]`.
//! Прокрутка на клон заканчивается прыжком без анимации на настоящий слайд,
//! поэтому листание по кругу выглядит непрерывным.

/// Постов на одном слайде.
pub const POSTS_PER_SLIDE: usize = 3;

/// Интервал автопрокрутки по умолчанию, мс.
pub const DEFAULT_SLIDE_INTERVAL_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
/// Состояние карусели.
pub struct Carousel<T> {
    slides: Vec<Vec<Option<T>>>,
    position: usize,
    animating: bool,
    paused: bool,
}

impl<T: Clone> Carousel<T> {
    /// Разбивает элементы на слайды по [`POSTS_PER_SLIDE`]; последний
    /// слайд добивается пустыми ячейками.
    pub fn new(items: Vec<T>) -> Self {
        let slides = items
            .chunks(POSTS_PER_SLIDE)
            .map(|chunk| {
                let mut slide: Vec<Option<T>> = chunk.iter().cloned().map(Some).collect();
                slide.resize(POSTS_PER_SLIDE, None);
                slide
            })
            .collect();

        Self {
            slides,
            position: 1,
            animating: true,
            paused: false,
        }
    }

    /// Лента для отрисовки с клонами по краям. Пустая, если постов нет.
    pub fn track(&self) -> Vec<Vec<Option<T>>> {
        let (Some(first), Some(last)) = (self.slides.first(), self.slides.last()) else {
            return Vec::new();
        };

        let mut track = Vec::with_capacity(self.slides.len() + 2);
        track.push(last.clone());
        track.extend(self.slides.iter().cloned());
        track.push(first.clone());
        track
    }
}

impl<T> Carousel<T> {
    /// Количество настоящих слайдов.
    pub fn total_pages(&self) -> usize {
        self.slides.len()
    }

    /// Длина ленты с клонами.
    pub fn track_len(&self) -> usize {
        if self.slides.is_empty() {
            0
        } else {
            self.slides.len() + 2
        }
    }

    /// Позиция в ленте (0 и `track_len - 1` это клоны).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Идёт ли сейчас анимированный переход.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Номер настоящего слайда, с 1, для точек-индикаторов.
    pub fn real_page(&self) -> usize {
        let len = self.track_len();
        if len == 0 {
            0
        } else if self.position == 0 {
            self.total_pages()
        } else if self.position == len - 1 {
            1
        } else {
            self.position
        }
    }

    /// Сдвиг ленты в процентах от её ширины.
    pub fn offset_percent(&self) -> f64 {
        let len = self.track_len();
        if len == 0 {
            return 0.0;
        }
        self.position as f64 * (100.0 / len as f64)
    }

    /// Следующий слайд.
    pub fn next(&mut self) -> bool {
        self.move_to(self.position + 1)
    }

    /// Предыдущий слайд.
    pub fn prev(&mut self) -> bool {
        match self.position.checked_sub(1) {
            Some(position) => self.move_to(position),
            None => false,
        }
    }

    /// Переход к настоящему слайду `page` (с 1), например по точке.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.move_to(page)
    }

    fn move_to(&mut self, position: usize) -> bool {
        if self.total_pages() <= 1 || !self.animating {
            return false;
        }
        self.position = position.min(self.track_len() - 1);
        self.animating = true;
        true
    }

    /// Конец CSS-перехода. Если лента приехала на клон, прыгает на
    /// соответствующий настоящий слайд без анимации и возвращает `true`.
    pub fn transition_end(&mut self) -> bool {
        let len = self.track_len();
        if len == 0 {
            return false;
        }
        if self.position == len - 1 {
            self.animating = false;
            self.position = 1;
            true
        } else if self.position == 0 {
            self.animating = false;
            self.position = len - 2;
            true
        } else {
            false
        }
    }

    /// Возвращает анимацию после прыжка (в браузере через кадр).
    pub fn resume_animation(&mut self) {
        self.animating = true;
    }

    /// Пауза автопрокрутки (курсор над каруселью).
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Должна ли сейчас работать автопрокрутка.
    pub fn auto_advance(&self, auto_slide: bool) -> bool {
        auto_slide && self.total_pages() > 1 && !self.paused
    }

    /// Ключ таймера автопрокрутки: `None`, когда прокрутка выключена,
    /// иначе текущая позиция. Таймер перезапускается при смене ключа, так
    /// что после ручного перехода отсчёт идёт заново.
    pub fn auto_advance_key(&self, auto_slide: bool) -> Option<usize> {
        self.auto_advance(auto_slide).then_some(self.position)
    }

    /// Кнопки ◀ ▶ только для ручного режима.
    pub fn show_nav_buttons(&self, auto_slide: bool) -> bool {
        self.total_pages() > 1 && !auto_slide
    }

    /// Точки-индикаторы.
    pub fn show_dots(&self) -> bool {
        self.total_pages() > 1
    }
}
