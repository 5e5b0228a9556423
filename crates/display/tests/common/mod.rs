use {base::Vec2, display::*};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(ProgramId),
    CreateTexture(TextureId),
    Allocate(TextureId, TextureSpec),
    Update(TextureId, usize),
    Viewport(Vec2<usize>),
    Clear,
    Draw(ProgramId, TextureId),
    Present,
    DeleteTexture(TextureId),
    DeleteProgram(ProgramId),
    Marker(&'static str),
}

/// Surface that records every call and can be told to fail deletes.
#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub next_id: u32,
    pub pending_resize: Option<Vec2<usize>>,
    pub fail_deletes: bool,
    pub fail_draws: bool,
}

#[allow(dead_code)]
impl RecordingSurface {
    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| matches(c)).count()
    }

    pub fn allocations(&self) -> Vec<TextureSpec> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Allocate(_, spec) => Some(*spec),
                _ => None,
            })
            .collect()
    }

    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl Surface for RecordingSurface {
    fn create_program(&mut self) -> Result<ProgramId, DisplayError> {
        let program = ProgramId(self.id());
        self.calls.push(Call::CreateProgram(program));
        Ok(program)
    }

    fn create_texture(&mut self) -> Result<TextureId, DisplayError> {
        let texture = TextureId(self.id());
        self.calls.push(Call::CreateTexture(texture));
        Ok(texture)
    }

    fn allocate_texture(
        &mut self,
        texture: TextureId,
        spec: TextureSpec,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        assert_eq!(data.len(), spec.byte_len());
        self.calls.push(Call::Allocate(texture, spec));
        Ok(())
    }

    fn update_texture(&mut self, texture: TextureId, data: &[u8]) -> Result<(), DisplayError> {
        self.calls.push(Call::Update(texture, data.len()));
        Ok(())
    }

    fn set_viewport(&mut self, size: Vec2<usize>) {
        self.calls.push(Call::Viewport(size));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn draw_quad(
        &mut self,
        program: ProgramId,
        texture: TextureId,
        _quad: &Quad,
    ) -> Result<(), DisplayError> {
        if self.fail_draws {
            return Err(DisplayError::Surface("draw rejected".to_string()));
        }
        self.calls.push(Call::Draw(program, texture));
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.calls.push(Call::Present);
        Ok(())
    }

    fn poll_resize(&mut self) -> Option<Vec2<usize>> {
        self.pending_resize.take()
    }

    fn delete_texture(&mut self, texture: TextureId) -> Result<(), DisplayError> {
        self.calls.push(Call::DeleteTexture(texture));
        if self.fail_deletes {
            return Err(DisplayError::ResourceTeardown("context lost".to_string()));
        }
        Ok(())
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<(), DisplayError> {
        self.calls.push(Call::DeleteProgram(program));
        if self.fail_deletes {
            return Err(DisplayError::ResourceTeardown("context lost".to_string()));
        }
        Ok(())
    }
}
